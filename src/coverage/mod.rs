//! Monte Carlo coverage estimation
//!
//! Pipeline: region area -> sample budget -> rejection sampling inside the
//! region -> sample/reference distance matrix -> covered labels and ratio.

pub mod area;
pub mod budget;
pub mod distance;
pub mod error;
pub mod estimator;
pub mod sampler;

pub use area::{area_km2, multi_polygon_area_km2};
pub use budget::sample_count;
pub use distance::{DistanceMatrix, EARTH_RADIUS_M, distances};
pub use error::CoverageError;
pub use estimator::{CoverageEstimator, EmptyReferencePolicy};
pub use sampler::{DEFAULT_MAX_BATCHES, DEFAULT_MAX_SAMPLES, PolygonSampler};
