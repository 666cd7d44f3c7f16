use serde::{Deserialize, Serialize};

/// One degree of latitude covers roughly this many miles; the same factor is
/// applied to longitude, which is acceptable at the scale of a single
/// delivery region.
pub const MILES_PER_DEGREE: f64 = 69.172;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar Euclidean distance in coordinate degrees. Used for clustering,
    /// where only the relative ordering of distances matters.
    pub fn planar_distance(&self, to: &LatLng) -> f64 {
        (self.lat - to.lat).hypot(self.lng - to.lng)
    }

    /// Scaled Euclidean distance in miles, optionally calibrated by a
    /// multiplier derived from real travel data.
    pub fn distance_miles(&self, to: &LatLng, multiplier: Option<f64>) -> f64 {
        let miles = self.planar_distance(to) * MILES_PER_DEGREE;
        match multiplier {
            Some(m) => miles * m,
            None => miles,
        }
    }
}

impl From<&LatLng> for [f64; 2] {
    fn from(location: &LatLng) -> Self {
        [location.lat, location.lng]
    }
}
