use crate::api::OverpassResponse;
use crate::domain::{ReferencePoint, Region};

/// Parse Overpass nodes into reference points inside `region`
///
/// The Overpass query only filters by bounding box, so nodes outside the
/// region's actual outline (or on its boundary) are dropped here. Elements
/// without coordinates are skipped.
pub fn parse_reference_points(response: &OverpassResponse, region: &Region) -> Vec<ReferencePoint> {
    response
        .elements
        .iter()
        .filter(|e| e.type_ == "node")
        .filter_map(|e| {
            let lat = e.lat?;
            let lon = e.lon?;
            if !region.contains(lat, lon) {
                return None;
            }

            let point = ReferencePoint::new(lat, lon);
            Some(match e.tags.as_ref().and_then(|t| t.get("name")) {
                Some(name) => point.with_name(name.as_str()),
                None => point,
            })
        })
        .collect()
}
