use foundation::GeoPoint;
use foundation::math::{Vec3, sphere_position};
use serde::{Deserialize, Serialize};

use crate::backend::PointOfView;

/// Seconds per revolution at speed 1.
pub const SECONDS_PER_REVOLUTION: f64 = 60.0;
pub const DEFAULT_AUTO_ROTATE_SPEED: f64 = 0.5;

/// Camera orbiting the globe centre.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitCamera {
    pub pov: PointOfView,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            pov: PointOfView::default(),
            auto_rotate: true,
            auto_rotate_speed: DEFAULT_AUTO_ROTATE_SPEED,
        }
    }
}

impl OrbitCamera {
    pub fn degrees_per_second(&self) -> f64 {
        360.0 / SECONDS_PER_REVOLUTION * self.auto_rotate_speed
    }

    /// Advances auto-rotation by `dt_s` seconds. Longitude stays in [-180, 180).
    pub fn advance(&mut self, dt_s: f64) {
        if !self.auto_rotate {
            return;
        }
        let lng = self.pov.lng + self.degrees_per_second() * dt_s;
        self.pov.lng = (lng + 180.0).rem_euclid(360.0) - 180.0;
    }

    /// Eye position for a unit globe.
    pub fn eye(&self) -> Vec3 {
        let target = GeoPoint {
            lat: self.pov.lat,
            lng: self.pov.lng,
        };
        sphere_position(target, 1.0, self.pov.altitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_speed_is_three_degrees_per_second() {
        let mut cam = OrbitCamera::default();
        assert_eq!(cam.degrees_per_second(), 3.0);
        cam.advance(10.0);
        assert!((cam.pov.lng - 30.0).abs() < 1e-9);
    }

    #[test]
    fn longitude_wraps() {
        let mut cam = OrbitCamera::default();
        cam.pov.lng = 179.0;
        cam.advance(1.0);
        assert!((cam.pov.lng - -178.0).abs() < 1e-9);
    }

    #[test]
    fn paused_camera_does_not_move() {
        let mut cam = OrbitCamera {
            auto_rotate: false,
            ..OrbitCamera::default()
        };
        cam.advance(5.0);
        assert_eq!(cam.pov.lng, 0.0);
        assert!((cam.eye().length() - 3.5).abs() < 1e-9);
    }
}
