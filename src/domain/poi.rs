use serde::Serialize;

/// A point of interest that provides coverage around itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferencePoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// `name` tag from OpenStreetMap, when known
    pub name: Option<String>,
}

impl ReferencePoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
