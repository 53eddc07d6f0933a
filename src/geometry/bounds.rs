use geo::{Coord, Rect};

/// Bounding box in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Overpass QL bbox filter: `south,west,north,east`
    pub fn to_overpass_bbox(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

impl From<Rect<f64>> for GeoBounds {
    fn from(rect: Rect<f64>) -> Self {
        let Coord { x: west, y: south } = rect.min();
        let Coord { x: east, y: north } = rect.max();
        Self {
            south,
            west,
            north,
            east,
        }
    }
}
