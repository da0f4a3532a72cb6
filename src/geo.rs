use crate::gpx_types::TrackPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Start/finish distance under which a track counts as a loop.
pub const DEFAULT_LOOP_TOLERANCE_M: f64 = 50.0;

/// Great-circle distance in meters between two lat/lon pairs given in degrees.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    // rounding can leave `a` just outside [0, 1] for near-antipodal pairs
    let a = ((dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

pub fn point_distance_m(a: &TrackPoint, b: &TrackPoint) -> f64 {
    haversine_distance_m(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Whether the first and last points lie within `tolerance_m` of each other.
///
/// A map-labelling heuristic only. Single-point tracks are not loops.
pub fn is_loop(points: &[TrackPoint], tolerance_m: f64) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => {
            point_distance_m(first, last) <= tolerance_m
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_distance_m(40.0, -105.0, 40.0, -105.0), 0.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        // 1 degree of latitude on a 6371 km sphere is ~111.195 km.
        let d = haversine_distance_m(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_194.93).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = haversine_distance_m(51.5074, -0.1278, 48.8566, 2.3522);
        let b = haversine_distance_m(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((a - b).abs() < 1e-6);
        // London to Paris is roughly 344 km.
        assert!((a / 1000.0 - 343.5).abs() < 2.0, "got {a}");
    }

    #[test]
    fn test_antimeridian() {
        let d = haversine_distance_m(0.0, 179.9995, 0.0, -179.9995);
        assert!(d < 200.0, "got {d}");
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_M;
        for (lat1, lon1, lat2, lon2) in [
            (0.0, 0.0, 0.0, 180.0),
            (87.5, 0.0, -87.5, 180.0),
            (-87.5, 180.0, 87.5, 0.0),
            (45.0, -120.0, -45.0, 60.0),
        ] {
            let d = haversine_distance_m(lat1, lon1, lat2, lon2);
            assert!(!d.is_nan(), "NaN for ({lat1}, {lon1}) -> ({lat2}, {lon2})");
            assert!((d - half).abs() < 1.0, "got {d}");
        }
    }

    #[test]
    fn test_loop_detection() {
        let start = TrackPoint::new(40.0, -105.0);
        let far = TrackPoint::new(40.01, -105.0);
        let near_start = TrackPoint::new(40.0003, -105.0);

        assert!(is_loop(&[start.clone(), far.clone(), near_start], 50.0));
        assert!(!is_loop(&[start.clone(), far], 50.0));
        assert!(!is_loop(&[start], 50.0));
        assert!(!is_loop(&[], 50.0));
    }
}
