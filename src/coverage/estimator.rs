use geo::Point;
use rand::Rng;

use super::budget::sample_count;
use super::distance::distances;
use super::sampler::PolygonSampler;
use super::CoverageError;
use crate::domain::{CoverageResult, ReferencePoint, Region, Sample};

/// What to do when there are no reference points at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyReferencePolicy {
    /// Draw samples anyway, label all of them uncovered, report ratio 0
    #[default]
    Uncovered,
    /// Fail with `NoReferencePoints` before sampling
    Reject,
}

/// Monte Carlo estimator of the fraction of a region within `radius_m` of
/// at least one reference point
#[derive(Debug, Clone, Default)]
pub struct CoverageEstimator {
    sampler: PolygonSampler,
    empty_references: EmptyReferencePolicy,
}

impl CoverageEstimator {
    pub fn new(sampler: PolygonSampler) -> Self {
        Self {
            sampler,
            empty_references: EmptyReferencePolicy::default(),
        }
    }

    pub fn with_empty_reference_policy(mut self, policy: EmptyReferencePolicy) -> Self {
        self.empty_references = policy;
        self
    }

    /// Estimate coverage of `region`.
    ///
    /// The sample count is `floor(area_km2 * density_per_km2)`; `radius_m` is
    /// compared directly against haversine distances in meters.
    ///
    /// # Errors
    /// * `NoReferencePoints` - empty `references` under `EmptyReferencePolicy::Reject`
    /// * `SampleBudgetExceeded` - the derived sample count is above the sampler's ceiling
    /// * `InsufficientCoverage` - the sampler hit its batch ceiling
    /// * `InvalidGeometry` - region is empty but the budget is positive
    pub fn estimate<R: Rng + ?Sized>(
        &self,
        region: &Region,
        references: &[ReferencePoint],
        radius_m: f64,
        density_per_km2: f64,
        rng: &mut R,
    ) -> Result<CoverageResult, CoverageError> {
        if references.is_empty() && self.empty_references == EmptyReferencePolicy::Reject {
            return Err(CoverageError::NoReferencePoints);
        }

        let count = sample_count(region, density_per_km2);
        let points = self.sampler.sample(region, count, rng)?;

        Ok(self.evaluate(&points, references, radius_m))
    }

    /// Label a fixed set of sample points and compute the covered ratio.
    ///
    /// A sample is covered when its nearest reference is at most `radius_m`
    /// away. With no samples, or no references, the ratio is 0.
    pub fn evaluate(
        &self,
        points: &[Point<f64>],
        references: &[ReferencePoint],
        radius_m: f64,
    ) -> CoverageResult {
        if points.is_empty() {
            return CoverageResult::empty();
        }

        let covered: Vec<bool> = match distances(points, references) {
            Some(matrix) => matrix.row_min().into_iter().map(|d| d <= radius_m).collect(),
            None => vec![false; points.len()],
        };

        let samples: Vec<Sample> = points
            .iter()
            .zip(covered)
            .map(|(p, covered)| Sample::new(p.y(), p.x(), covered))
            .collect();

        let hits = samples.iter().filter(|s| s.covered).count();
        let ratio = hits as f64 / samples.len() as f64;

        CoverageResult { ratio, samples }
    }
}
