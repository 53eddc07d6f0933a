use thiserror::Error;

/// Failures raised by the coverage engine.
///
/// The zero-sample and zero-reference cases are not errors: they produce a
/// valid `CoverageResult` with ratio 0.
#[derive(Debug, Error, PartialEq)]
pub enum CoverageError {
    #[error("invalid geometry: expected Polygon or MultiPolygon, got {0}")]
    InvalidGeometry(String),

    #[error(
        "sampler accepted only {accepted} of {requested} points after {batches} batches \
         (region fills too little of its bounding box)"
    )]
    InsufficientCoverage {
        requested: usize,
        accepted: usize,
        batches: usize,
    },

    #[error("sample budget of {requested} points exceeds the limit of {limit}")]
    SampleBudgetExceeded { requested: usize, limit: usize },

    #[error("no reference points to measure coverage against")]
    NoReferencePoints,
}
