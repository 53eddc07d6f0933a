use anyhow::{Context, Result, bail};
use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use serde::Deserialize;
use std::thread;
use std::time::Duration;

use super::ApiError;
use crate::config::NominatimConfig;

const USER_AGENT: &str = "coverage-map/0.1.0 (store coverage estimator)";

#[derive(Debug, Deserialize)]
struct NominatimResult {
    display_name: String,
    #[serde(default)]
    geojson: Option<GeoJsonGeometry>,
}

/// GeoJSON position; altitude and any further values are ignored
type Position = Vec<f64>;
type Ring = Vec<Position>;

/// GeoJSON geometry as returned with `polygon_geojson=1`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point { coordinates: Position },
    LineString { coordinates: Ring },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

impl GeoJsonGeometry {
    /// Convert to a `geo` geometry; `None` for geometry types we do not model
    pub fn into_geometry(self) -> Option<Geometry<f64>> {
        match self {
            GeoJsonGeometry::Point { coordinates } => {
                to_coord(&coordinates).map(|c| Geometry::Point(Point::from(c)))
            }
            GeoJsonGeometry::LineString { coordinates } => {
                Some(Geometry::LineString(to_line_string(coordinates)))
            }
            GeoJsonGeometry::Polygon { coordinates } => {
                Some(Geometry::Polygon(rings_to_polygon(coordinates)))
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => Some(Geometry::MultiPolygon(
                MultiPolygon::new(coordinates.into_iter().map(rings_to_polygon).collect()),
            )),
            GeoJsonGeometry::Unsupported => None,
        }
    }
}

fn to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn to_line_string(ring: Ring) -> LineString<f64> {
    ring.iter().filter_map(|p| to_coord(p)).collect()
}

fn rings_to_polygon(rings: Vec<Ring>) -> Polygon<f64> {
    let mut rings = rings.into_iter().map(to_line_string);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

/// Resolve a place name to its administrative boundary.
///
/// Uses the Nominatim search API with `polygon_geojson=1` and returns the
/// first match. Includes a 1 second delay for rate limiting (Nominatim ToS).
///
/// # Returns
/// * `Ok((display_name, geometry))`
/// * `Err` - `ApiError::PlaceNotFound` when nothing matches, or a transport error
pub fn geocode_boundary(place: &str, config: &NominatimConfig) -> Result<(String, Geometry<f64>)> {
    // Rate limiting - Nominatim requires max 1 request per second
    thread::sleep(Duration::from_secs(1));

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(&config.url)
        .query(&[
            ("q", place),
            ("format", "json"),
            ("polygon_geojson", "1"),
            ("limit", "1"),
        ])
        .send()
        .context("Failed to send request to Nominatim API")?;

    if !response.status().is_success() {
        bail!("Nominatim API returned error status: {}", response.status());
    }

    let results: Vec<NominatimResult> = response
        .json()
        .context("Failed to parse Nominatim JSON response")?;

    first_boundary(place, results)
}

fn first_boundary(place: &str, results: Vec<NominatimResult>) -> Result<(String, Geometry<f64>)> {
    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::PlaceNotFound(place.to_string()))?;

    let geometry = result
        .geojson
        .and_then(GeoJsonGeometry::into_geometry)
        .ok_or_else(|| ApiError::UnsupportedGeometry {
            place: place.to_string(),
        })?;

    Ok((result.display_name, geometry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_polygon_response() {
        let json = r#"[{
            "lat": "24.1",
            "lon": "120.6",
            "display_name": "Taichung, Taiwan",
            "geojson": {"type": "Polygon", "coordinates": [[[120.0, 24.0], [121.0, 24.0], [121.0, 25.0], [120.0, 24.0]]]}
        }]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();

        let (name, geometry) = first_boundary("Taichung", results).unwrap();
        assert_eq!(name, "Taichung, Taiwan");
        match geometry {
            Geometry::Polygon(p) => assert_eq!(p.exterior().0.len(), 4),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_multipolygon_with_hole() {
        let json = r#"{"type": "MultiPolygon", "coordinates": [
            [[[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]], [[1, 1], [2, 1], [2, 2], [1, 1]]],
            [[[10, 10], [11, 10], [11, 11], [10, 10]]]
        ]}"#;
        let geojson: GeoJsonGeometry = serde_json::from_str(json).unwrap();

        match geojson.into_geometry() {
            Some(Geometry::MultiPolygon(mp)) => {
                assert_eq!(mp.0.len(), 2);
                assert_eq!(mp.0[0].interiors().len(), 1);
            }
            other => panic!("expected multipolygon, got {other:?}"),
        }
    }

    #[test]
    fn test_point_geometry_is_kept_for_later_validation() {
        let json = r#"{"type": "Point", "coordinates": [120.6, 24.1]}"#;
        let geojson: GeoJsonGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(
            geojson.into_geometry(),
            Some(Geometry::Point(Point::new(120.6, 24.1)))
        );
    }

    #[test]
    fn test_positions_with_altitude() {
        let json = r#"{"type": "Polygon", "coordinates": [[[0, 0, 12.5], [4, 0, 3], [4, 4, 0], [0, 0, 12.5]]]}"#;
        let geojson: GeoJsonGeometry = serde_json::from_str(json).unwrap();

        match geojson.into_geometry() {
            Some(Geometry::Polygon(p)) => {
                assert_eq!(p.exterior().0.len(), 4);
                assert_eq!(p.exterior().0[1], Coord { x: 4.0, y: 0.0 });
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_point_with_altitude_reaches_region_validation() {
        let json = r#"[{
            "display_name": "Summit",
            "geojson": {"type": "Point", "coordinates": [120.6, 24.1, 3952.0]}
        }]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();

        let (_, geometry) = first_boundary("Summit", results).unwrap();
        assert_eq!(geometry, Geometry::Point(Point::new(120.6, 24.1)));

        let err = crate::domain::Region::try_from(geometry).unwrap_err();
        assert_eq!(
            err,
            crate::coverage::CoverageError::InvalidGeometry("Point".to_string())
        );
    }

    #[test]
    fn test_unknown_geometry_type() {
        let json = r#"{"type": "GeometryCollection", "geometries": []}"#;
        let geojson: GeoJsonGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(geojson, GeoJsonGeometry::Unsupported);
    }

    #[test]
    fn test_empty_results_is_place_not_found() {
        let err = first_boundary("Atlantis", Vec::new()).unwrap_err();
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::PlaceNotFound(place)) => assert_eq!(place, "Atlantis"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_geojson_is_unsupported() {
        let json = r#"[{"display_name": "Somewhere"}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();

        let err = first_boundary("Somewhere", results).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::UnsupportedGeometry { .. })
        ));
    }
}
