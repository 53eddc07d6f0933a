use geo::orient::{Direction, Orient};
use geo::{GeodesicArea, Geometry, MultiPolygon, Polygon};

use super::CoverageError;

const M2_PER_KM2: f64 = 1_000_000.0;

/// Geodesic surface area of a polygon or multi-polygon in km².
///
/// Areas are measured on the WGS84 ellipsoid. Each part contributes the area
/// of its exterior ring only, so interior holes are not subtracted and
/// overlapping parts are counted twice.
///
/// # Errors
/// * `InvalidGeometry` - for anything other than `Polygon` / `MultiPolygon`
pub fn area_km2(geometry: &Geometry<f64>) -> Result<f64, CoverageError> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(exterior_area_m2(polygon) / M2_PER_KM2),
        Geometry::MultiPolygon(multi) => Ok(multi_polygon_area_km2(multi)),
        other => Err(CoverageError::InvalidGeometry(
            geometry_kind(other).to_string(),
        )),
    }
}

/// Sum of the exterior-ring geodesic areas of every part, in km²
pub fn multi_polygon_area_km2(multi: &MultiPolygon<f64>) -> f64 {
    let total_m2: f64 = multi.iter().map(exterior_area_m2).sum();
    total_m2 / M2_PER_KM2
}

fn exterior_area_m2(polygon: &Polygon<f64>) -> f64 {
    // A closed ring needs at least three distinct vertices plus the closing one
    if polygon.exterior().0.len() < 4 {
        return 0.0;
    }

    let outer = Polygon::new(polygon.exterior().clone(), vec![]).orient(Direction::Default);
    outer.geodesic_area_unsigned()
}

pub(crate) fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
