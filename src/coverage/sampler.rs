use geo::{Contains, Point};
use rand::Rng;

use super::CoverageError;
use crate::domain::Region;

/// Default cap on candidate batches before giving up
pub const DEFAULT_MAX_BATCHES: usize = 1000;
/// Default cap on the number of points a single call may request
pub const DEFAULT_MAX_SAMPLES: usize = 5_000_000;

/// Rejection sampler over a region's bounding box.
///
/// Candidates are drawn uniformly in degree space, so density per km² thins
/// out towards the poles. This is negligible at city scale but noticeable for
/// country-sized regions.
#[derive(Debug, Clone)]
pub struct PolygonSampler {
    max_batches: usize,
    max_samples: usize,
}

impl Default for PolygonSampler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BATCHES)
    }
}

impl PolygonSampler {
    pub fn new(max_batches: usize) -> Self {
        Self {
            max_batches,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Draw exactly `count` points strictly inside `region`.
    ///
    /// Each batch draws `2 * count` candidates from the bounding box and keeps
    /// the ones inside the region, in draw order, until `count` are collected.
    /// Points are returned as `geo::Point` (x = lon, y = lat).
    ///
    /// # Errors
    /// * `SampleBudgetExceeded` - `count` is above the sample ceiling
    /// * `InvalidGeometry` - region is empty but `count > 0`
    /// * `InsufficientCoverage` - batch ceiling hit before `count` points were accepted
    pub fn sample<R: Rng + ?Sized>(
        &self,
        region: &Region,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Point<f64>>, CoverageError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if count > self.max_samples {
            return Err(CoverageError::SampleBudgetExceeded {
                requested: count,
                limit: self.max_samples,
            });
        }

        let bounds = region
            .bounds()
            .ok_or_else(|| CoverageError::InvalidGeometry("empty region".to_string()))?;

        let shape = region.shape();
        let batch_size = count.saturating_mul(2);
        let mut accepted: Vec<Point<f64>> = Vec::with_capacity(count);

        for _ in 0..self.max_batches {
            let candidates: Vec<Point<f64>> = (0..batch_size)
                .map(|_| {
                    Point::new(
                        rng.random_range(bounds.west..=bounds.east),
                        rng.random_range(bounds.south..=bounds.north),
                    )
                })
                .collect();

            let remaining = count - accepted.len();
            accepted.extend(
                candidates
                    .into_iter()
                    .filter(|p| shape.contains(p))
                    .take(remaining),
            );

            if accepted.len() == count {
                return Ok(accepted);
            }
        }

        Err(CoverageError::InsufficientCoverage {
            requested: count,
            accepted: accepted.len(),
            batches: self.max_batches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Polygon, polygon};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn region(polygons: Vec<Polygon<f64>>) -> Region {
        Region::new(MultiPolygon::new(polygons))
    }

    fn square(x0: f64, y0: f64, side: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0, y: y0 + side),
            (x: x0 + side, y: y0 + side),
            (x: x0 + side, y: y0),
        ]
    }

    #[test]
    fn test_returns_exact_count_inside() {
        let region = region(vec![square(0.0, 0.0, 1.0)]);
        let mut rng = StdRng::seed_from_u64(7);

        let points = PolygonSampler::default()
            .sample(&region, 500, &mut rng)
            .unwrap();

        assert_eq!(points.len(), 500);
        assert!(points.iter().all(|p| region.contains(p.y(), p.x())));
    }

    #[test]
    fn test_zero_count_is_empty() {
        let region = region(vec![square(0.0, 0.0, 1.0)]);
        let mut rng = StdRng::seed_from_u64(7);

        let points = PolygonSampler::default().sample(&region, 0, &mut rng).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_concave_region() {
        // L-shape: fills three quarters of its bounding box
        let l_shape = Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (2.0, 0.0),
                (2.0, 1.0),
                (1.0, 1.0),
                (1.0, 2.0),
                (0.0, 2.0),
                (0.0, 0.0),
            ]),
            vec![],
        );
        let region = region(vec![l_shape]);
        let mut rng = StdRng::seed_from_u64(11);

        let points = PolygonSampler::default()
            .sample(&region, 300, &mut rng)
            .unwrap();

        assert_eq!(points.len(), 300);
        assert!(!points.iter().any(|p| p.x() > 1.0 && p.y() > 1.0));
    }

    #[test]
    fn test_multi_part_region_hits_both_parts() {
        let region = region(vec![square(0.0, 0.0, 0.5), square(9.5, 9.5, 0.5)]);
        let mut rng = StdRng::seed_from_u64(3);

        let points = PolygonSampler::default()
            .sample(&region, 200, &mut rng)
            .unwrap();

        assert_eq!(points.len(), 200);
        assert!(points.iter().any(|p| p.x() < 1.0));
        assert!(points.iter().any(|p| p.x() > 9.0));
    }

    #[test]
    fn test_holes_are_excluded() {
        let hole = LineString::from(vec![
            (0.2, 0.2),
            (0.8, 0.2),
            (0.8, 0.8),
            (0.2, 0.8),
            (0.2, 0.2),
        ]);
        let donut = Polygon::new(square(0.0, 0.0, 1.0).exterior().clone(), vec![hole]);
        let region = region(vec![donut]);
        let mut rng = StdRng::seed_from_u64(5);

        let points = PolygonSampler::default()
            .sample(&region, 200, &mut rng)
            .unwrap();

        assert!(
            !points
                .iter()
                .any(|p| p.x() > 0.2 && p.x() < 0.8 && p.y() > 0.2 && p.y() < 0.8)
        );
    }

    #[test]
    fn test_batch_ceiling_reports_shortfall() {
        // A thin sliver in a huge bounding box: two tiny squares far apart
        let region = region(vec![square(0.0, 0.0, 1e-4), square(50.0, 50.0, 1e-4)]);
        let mut rng = StdRng::seed_from_u64(1);

        let err = PolygonSampler::new(2)
            .sample(&region, 100, &mut rng)
            .unwrap_err();

        match err {
            CoverageError::InsufficientCoverage {
                requested,
                accepted,
                batches,
            } => {
                assert_eq!(requested, 100);
                assert!(accepted < 100);
                assert_eq!(batches, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_count_above_ceiling_is_rejected() {
        let region = region(vec![square(0.0, 0.0, 1.0)]);
        let mut rng = StdRng::seed_from_u64(1);

        let err = PolygonSampler::default()
            .with_max_samples(100)
            .sample(&region, 101, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            CoverageError::SampleBudgetExceeded {
                requested: 101,
                limit: 100,
            }
        );

        let err = PolygonSampler::default()
            .sample(&region, usize::MAX, &mut rng)
            .unwrap_err();
        assert!(matches!(err, CoverageError::SampleBudgetExceeded { .. }));
    }

    #[test]
    fn test_empty_region_with_positive_count() {
        let region = region(vec![]);
        let mut rng = StdRng::seed_from_u64(1);

        let err = PolygonSampler::default()
            .sample(&region, 10, &mut rng)
            .unwrap_err();
        assert!(matches!(err, CoverageError::InvalidGeometry(_)));
    }

    #[test]
    fn test_same_seed_same_points() {
        let region = region(vec![square(0.0, 0.0, 1.0)]);
        let sampler = PolygonSampler::default();

        let a = sampler
            .sample(&region, 50, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = sampler
            .sample(&region, 50, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }
}
