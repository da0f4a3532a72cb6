//! Fixed-factor conversions between the imperial and metric views.

use crate::gpx_types::{ElevationProfilePoint, ImperialProfile, MetricProfile};

pub const KM_PER_MILE: f64 = 1.60934;
pub const METERS_PER_FOOT: f64 = 0.3048;
pub const METERS_PER_MILE: f64 = KM_PER_MILE * 1000.0;

pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters / METERS_PER_FOOT
}

/// "2.3 mi"
pub fn format_miles(miles: f64) -> String {
    format!("{miles:.1} mi")
}

/// "3.7 km"
pub fn format_km(km: f64) -> String {
    format!("{km:.1} km")
}

/// Metric view of a profile entry, derived from its imperial fields.
pub fn to_metric(point: &ElevationProfilePoint) -> MetricProfile {
    let distance_km = miles_to_km(point.distance);
    MetricProfile {
        distance_km,
        elevation_m: point.elevation.map(feet_to_meters),
        distance_label_km: format_km(distance_km),
    }
}

/// Inverse of [`to_metric`].
pub fn to_imperial(metric: &MetricProfile) -> ImperialProfile {
    let distance = km_to_miles(metric.distance_km);
    ImperialProfile {
        distance,
        elevation: metric.elevation_m.map(meters_to_feet),
        distance_label: format_miles(distance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_point(distance: f64, elevation: Option<f64>) -> ElevationProfilePoint {
        ElevationProfilePoint {
            distance,
            elevation,
            distance_label: format_miles(distance),
            distance_km: miles_to_km(distance),
            elevation_m: elevation.map(feet_to_meters),
            distance_label_km: format_km(miles_to_km(distance)),
        }
    }

    #[test]
    fn test_distance_round_trip() {
        for miles in [0.0, 0.138, 1.0, 26.2, 1234.5678] {
            assert!((km_to_miles(miles_to_km(miles)) - miles).abs() < 1e-6);
        }
    }

    #[test]
    fn test_elevation_round_trip() {
        for meters in [-86.0, 0.0, 1609.0, 3010.0, 8848.86] {
            assert!((feet_to_meters(meters_to_feet(meters)) - meters).abs() < 1e-6);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(format_miles(2.34), "2.3 mi");
        assert_eq!(format_km(3.66), "3.7 km");
        assert_eq!(format_miles(0.0), "0.0 mi");
    }

    #[test]
    fn test_to_metric() {
        let metric = to_metric(&profile_point(10.0, Some(1000.0)));
        assert!((metric.distance_km - 16.0934).abs() < 1e-9);
        assert!((metric.elevation_m.unwrap() - 304.8).abs() < 1e-9);
        assert_eq!(metric.distance_label_km, "16.1 km");
    }

    #[test]
    fn test_to_imperial_inverts_to_metric() {
        let original = profile_point(3.7, Some(9875.3));
        let back = to_imperial(&to_metric(&original));
        assert!((back.distance - original.distance).abs() < 1e-6);
        assert!((back.elevation.unwrap() - original.elevation.unwrap()).abs() < 1e-6);
        assert_eq!(back.distance_label, original.distance_label);
    }

    #[test]
    fn test_missing_elevation_stays_missing() {
        let metric = to_metric(&profile_point(1.0, None));
        assert_eq!(metric.elevation_m, None);
        assert_eq!(to_imperial(&metric).elevation, None);
    }
}
