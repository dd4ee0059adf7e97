use serde::{Deserialize, Serialize};

/// Earth's radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// A coordinate pair in decimal degrees (WGS84)
///
/// No range validation happens here. Callers at the HTTP boundary reject
/// out-of-range values before a point is built from client input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a point from nullable columns; both halves must be present
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Great-circle distance to another point in miles
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lng1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lng2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in miles. NaN or infinite inputs propagate into the result.
#[inline]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Distance between two points in miles
#[inline]
pub fn distance(p1: GeoPoint, p2: GeoPoint) -> f64 {
    p1.distance_to(&p2)
}
