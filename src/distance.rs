//! Great-circle distance on a spherical earth.

use serde::{Deserialize, Serialize};

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres spanned by one degree of latitude.
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to another coordinate in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine(*self, *other)
    }

    /// Arithmetic mean of a set of coordinates, `None` when empty.
    pub fn centroid<'a, I>(points: I) -> Option<Coordinate>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut sum_lat = 0.0;
        let mut sum_lon = 0.0;
        let mut count = 0usize;

        for point in points {
            sum_lat += point.latitude;
            sum_lon += point.longitude;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Coordinate::new(
            sum_lat / count as f64,
            sum_lon / count as f64,
        ))
    }
}

/// Calculate the haversine distance between two coordinates in kilometres.
///
/// The result is symmetric and non-negative. Identical inputs yield exactly
/// zero. Validation of non-finite input happens on the stop boundary, so this
/// function never fails.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;

    // Rounding can push h marginally outside [0, 1] for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}
