pub mod poi;
pub mod region;
pub mod sample;

pub use poi::ReferencePoint;
pub use region::Region;
pub use sample::{CoverageResult, Sample};
