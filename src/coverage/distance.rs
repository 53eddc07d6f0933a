use geo::Point;

use crate::domain::ReferencePoint;

/// Mean Earth radius used by the haversine kernel, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Dense row-major matrix of great-circle distances in meters.
///
/// Row `i` is a sample, column `j` a reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    /// Distance from each sample to its nearest reference point
    pub fn row_min(&self) -> Vec<f64> {
        self.data
            .chunks_exact(self.cols)
            .map(|row| row.iter().copied().fold(f64::INFINITY, f64::min))
            .collect()
    }
}

/// Latitude, longitude and cos(latitude), all in radians, stored column-wise
struct RadianColumns {
    lat: Vec<f64>,
    lon: Vec<f64>,
    cos_lat: Vec<f64>,
}

impl RadianColumns {
    fn from_degrees(points: impl ExactSizeIterator<Item = (f64, f64)>) -> Self {
        let mut columns = Self {
            lat: Vec::with_capacity(points.len()),
            lon: Vec::with_capacity(points.len()),
            cos_lat: Vec::with_capacity(points.len()),
        };
        for (lat, lon) in points {
            let lat = lat.to_radians();
            columns.lat.push(lat);
            columns.lon.push(lon.to_radians());
            columns.cos_lat.push(lat.cos());
        }
        columns
    }
}

/// Great-circle distance in meters between two points given in radians
#[cfg(test)]
fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_kernel(lat1, lon1, lat1.cos(), lat2, lon2, lat2.cos())
}

#[inline]
fn haversine_kernel(lat1: f64, lon1: f64, cos1: f64, lat2: f64, lon2: f64, cos2: f64) -> f64 {
    let half_dlat = ((lat2 - lat1) * 0.5).sin();
    let half_dlon = ((lon2 - lon1) * 0.5).sin();
    // Rounding can push `a` a hair past 1 for antipodal points
    let a = (half_dlat * half_dlat + cos1 * cos2 * half_dlon * half_dlon).clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Full sample x reference distance matrix.
///
/// Reference coordinates are converted to radians once and laid out as
/// parallel arrays; each sample row is then filled in a single pass over
/// them. Returns `None` when there are no reference points.
pub fn distances(samples: &[Point<f64>], references: &[ReferencePoint]) -> Option<DistanceMatrix> {
    if references.is_empty() {
        return None;
    }

    let refs = RadianColumns::from_degrees(references.iter().map(|r| (r.lat, r.lon)));
    let pts = RadianColumns::from_degrees(samples.iter().map(|p| (p.y(), p.x())));

    let cols = references.len();
    let mut data = vec![0.0; samples.len() * cols];

    for (row, ((&lat1, &lon1), &cos1)) in data
        .chunks_exact_mut(cols)
        .zip(pts.lat.iter().zip(&pts.lon).zip(&pts.cos_lat))
    {
        row.iter_mut()
            .zip(refs.lat.iter().zip(&refs.lon).zip(&refs.cos_lat))
            .for_each(|(d, ((&lat2, &lon2), &cos2))| {
                *d = haversine_kernel(lat1, lon1, cos1, lat2, lon2, cos2);
            });
    }

    Some(DistanceMatrix {
        rows: samples.len(),
        cols,
        data,
    })
}
