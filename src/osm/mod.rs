pub mod parser;

pub use parser::parse_reference_points;
