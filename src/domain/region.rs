use geo::{BoundingRect, Centroid, Contains, Geometry, MultiPolygon, Point};

use crate::coverage::area::{geometry_kind, multi_polygon_area_km2};
use crate::coverage::CoverageError;
use crate::geometry::GeoBounds;

/// A sampling domain: one or more polygons in (lon, lat) degrees.
///
/// Coordinates follow `geo` conventions: x = longitude, y = latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    shape: MultiPolygon<f64>,
}

impl Region {
    pub fn new(shape: MultiPolygon<f64>) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Geodesic area in km² (exterior rings only)
    pub fn area_km2(&self) -> f64 {
        multi_polygon_area_km2(&self.shape)
    }

    /// Axis-aligned bounding box in degrees, `None` for an empty region
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.shape.bounding_rect().map(GeoBounds::from)
    }

    /// Strict containment test; points on the boundary or inside a hole are outside
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.shape.contains(&Point::new(lon, lat))
    }

    /// Planar centroid as (lat, lon), used to centre maps
    pub fn centroid(&self) -> Option<(f64, f64)> {
        self.shape.centroid().map(|c| (c.y(), c.x()))
    }
}

impl TryFrom<Geometry<f64>> for Region {
    type Error = CoverageError;

    fn try_from(geometry: Geometry<f64>) -> Result<Self, Self::Error> {
        match geometry {
            Geometry::Polygon(polygon) => Ok(Self::new(MultiPolygon::new(vec![polygon]))),
            Geometry::MultiPolygon(multi) => Ok(Self::new(multi)),
            other => Err(CoverageError::InvalidGeometry(
                geometry_kind(&other).to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, polygon};

    fn square_region() -> Region {
        Region::try_from(Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0),
        ]))
        .unwrap()
    }

    #[test]
    fn test_region_from_polygon() {
        let region = square_region();
        assert_eq!(region.shape().0.len(), 1);
    }

    #[test]
    fn test_region_rejects_line() {
        let line = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        let err = Region::try_from(Geometry::LineString(line)).unwrap_err();
        assert_eq!(err, CoverageError::InvalidGeometry("LineString".to_string()));
    }

    #[test]
    fn test_contains_uses_lat_lon_order() {
        let region = square_region();
        assert!(region.contains(0.5, 0.5));
        assert!(!region.contains(0.5, 1.5));
        // On the boundary counts as outside
        assert!(!region.contains(0.0, 0.5));
    }

    #[test]
    fn test_bounds_and_centroid() {
        let region = square_region();
        let bounds = region.bounds().unwrap();
        assert_eq!(bounds.south, 0.0);
        assert_eq!(bounds.north, 1.0);
        assert_eq!(bounds.west, 0.0);
        assert_eq!(bounds.east, 1.0);

        let (lat, lon) = region.centroid().unwrap();
        assert!((lat - 0.5).abs() < 1e-9);
        assert!((lon - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_region() {
        let region = Region::new(MultiPolygon::new(vec![]));
        assert!(region.bounds().is_none());
        assert_eq!(region.area_km2(), 0.0);
    }
}
