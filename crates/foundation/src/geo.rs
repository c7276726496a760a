use serde::{Deserialize, Serialize};

/// A displayable geographic position in degrees.
///
/// Construction validates ranges, so any `GeoPoint` in hand is safe to plot.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Returns `None` unless both coordinates are finite and in range.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self { lat, lng })
    }

    /// Builds a point from optional wire fields; a missing coordinate is undisplayable.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        Self::new(lat?, lng?)
    }

    /// Exact coordinate match, used to resolve picked labels back to their source.
    pub fn same_position(&self, lat: f64, lng: f64) -> bool {
        self.lat == lat && self.lng == lng
    }
}
