use crate::domain::Region;

/// Number of Monte Carlo samples for a region: `floor(area_km2 * density)`.
///
/// No minimum is enforced, so tiny regions may get zero samples. Negative or
/// non-finite densities yield 0. Densities between 50 and 500 per km² give
/// stable ratios at city scale.
pub fn sample_count(region: &Region, density_per_km2: f64) -> usize {
    count_for_area(region.area_km2(), density_per_km2)
}

pub(crate) fn count_for_area(area_km2: f64, density_per_km2: f64) -> usize {
    let raw = (area_km2 * density_per_km2).floor();
    if raw.is_finite() && raw > 0.0 {
        raw as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, polygon};

    fn square_region() -> Region {
        Region::new(MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0),
        ]]))
    }

    #[test]
    fn test_count_for_area_floors() {
        assert_eq!(count_for_area(10.0, 2.5), 25);
        assert_eq!(count_for_area(1.99, 1.0), 1);
        assert_eq!(count_for_area(0.4, 1.0), 0);
    }

    #[test]
    fn test_count_for_degenerate_inputs() {
        assert_eq!(count_for_area(0.0, 200.0), 0);
        assert_eq!(count_for_area(10.0, -5.0), 0);
        assert_eq!(count_for_area(10.0, f64::NAN), 0);
        assert_eq!(count_for_area(f64::INFINITY, 1.0), 0);
    }

    #[test]
    fn test_sample_count_scales_with_density() {
        let region = square_region();
        let single = sample_count(&region, 0.1);
        let double = sample_count(&region, 0.2);

        assert!(single > 1000);
        // floor() can shave off at most one sample per call
        assert!(double.abs_diff(2 * single) <= 1);
    }

    #[test]
    fn test_empty_region_has_no_budget() {
        let region = Region::new(MultiPolygon::new(vec![]));
        assert_eq!(sample_count(&region, 500.0), 0);
    }
}
