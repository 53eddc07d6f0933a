pub mod nominatim;
pub mod overpass;

use thiserror::Error;

pub use nominatim::{GeoJsonGeometry, geocode_boundary};
pub use overpass::{OverpassResponse, fetch_named_nodes};

/// Failures originating in the geocoding / map-data services
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("place not found: {0}")]
    PlaceNotFound(String),

    #[error("{place} resolved to unsupported boundary geometry")]
    UnsupportedGeometry { place: String },
}
