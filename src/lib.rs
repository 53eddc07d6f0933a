//! coverage-map - Estimate what share of a region lies within reach of a brand's stores

pub mod api;
pub mod config;
pub mod coverage;
pub mod domain;
pub mod geometry;
pub mod osm;
pub mod report;
