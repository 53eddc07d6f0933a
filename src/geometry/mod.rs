pub mod bounds;

pub use bounds::GeoBounds;
