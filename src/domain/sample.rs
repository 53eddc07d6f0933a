use serde::Serialize;

/// A Monte Carlo sample point inside the region
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub lat: f64,
    pub lon: f64,
    /// Within the radius of at least one reference point
    pub covered: bool,
}

impl Sample {
    pub fn new(lat: f64, lon: f64, covered: bool) -> Self {
        Self { lat, lon, covered }
    }
}

/// Outcome of one estimation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageResult {
    /// Fraction of samples that are covered, in [0, 1]
    pub ratio: f64,
    pub samples: Vec<Sample>,
}

impl CoverageResult {
    /// Result with no samples; ratio is 0
    pub fn empty() -> Self {
        Self {
            ratio: 0.0,
            samples: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn covered_count(&self) -> usize {
        self.samples.iter().filter(|s| s.covered).count()
    }
}
