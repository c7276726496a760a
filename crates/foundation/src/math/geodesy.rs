use super::Vec3;
use crate::geo::GeoPoint;

/// Mean Earth radius (kilometers) used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance between two points (haversine formula), in km.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Position on a sphere of the given radius, lifted by `altitude` (fraction of radius).
///
/// Axis convention follows the globe renderer: +Y is north, the prime meridian
/// faces +Z and longitude increases towards +X.
pub fn sphere_position(point: GeoPoint, radius: f64, altitude: f64) -> Vec3 {
    let r = radius * (1.0 + altitude);
    let phi = (90.0 - point.lat).to_radians();
    let theta = (90.0 - point.lng).to_radians();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::{haversine_km, sphere_position};
    use crate::geo::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn haversine_new_york_to_paris() {
        let ny = GeoPoint::new(40.7128, -74.0060).unwrap();
        let paris = GeoPoint::new(48.8566, 2.3522).unwrap();
        assert_close(haversine_km(ny, paris), 5837.0, 10.0);
    }

    #[test]
    fn haversine_is_zero_for_same_point() {
        let p = GeoPoint::new(35.6762, 139.6503).unwrap();
        assert_close(haversine_km(p, p), 0.0, 1e-9);
    }

    #[test]
    fn sphere_position_prime_meridian_faces_z() {
        let v = sphere_position(GeoPoint::new(0.0, 0.0).unwrap(), 100.0, 0.0);
        assert_close(v.x, 0.0, 1e-9);
        assert_close(v.y, 0.0, 1e-9);
        assert_close(v.z, 100.0, 1e-9);

        let north = sphere_position(GeoPoint::new(90.0, 0.0).unwrap(), 100.0, 0.5);
        assert_close(north.y, 150.0, 1e-9);
    }
}
