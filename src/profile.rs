//! Chart/map lookups over an analyzed track. Display-density concerns live
//! here so the analyzer always returns one profile entry per point.

use crate::geo::haversine_distance_m;
use crate::gpx_types::{ElevationProfilePoint, TrackPoint};

/// Index of the profile entry whose distance is nearest `distance` (miles).
///
/// Relies on profile distances being non-decreasing. Ties go to the earlier entry.
pub fn profile_index_at_distance(profile: &[ElevationProfilePoint], distance: f64) -> Option<usize> {
    if profile.is_empty() || distance.is_nan() {
        return None;
    }

    let upper = profile.partition_point(|p| p.distance < distance);
    if upper == 0 {
        return Some(0);
    }
    if upper == profile.len() {
        return Some(profile.len() - 1);
    }

    let below = distance - profile[upper - 1].distance;
    let above = profile[upper].distance - distance;
    Some(if below <= above { upper - 1 } else { upper })
}

/// Index of the track point nearest a map coordinate.
pub fn nearest_point_index(points: &[TrackPoint], latitude: f64, longitude: f64) -> Option<usize> {
    points
        .iter()
        .map(|p| haversine_distance_m(p.latitude, p.longitude, latitude, longitude))
        .enumerate()
        .filter(|(_, d)| !d.is_nan())
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// Index of the first point carrying the highest elevation.
pub fn peak_index(points: &[TrackPoint]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, ele) in points.iter().enumerate().filter_map(|(i, p)| p.elevation.map(|e| (i, e))) {
        if best.is_none_or(|(_, b)| ele > b) {
            best = Some((i, ele));
        }
    }
    best.map(|(i, _)| i)
}

/// Evenly thin a profile to at most `max_points` entries, keeping the first
/// and last. Returns the profile unchanged when it already fits.
pub fn downsample_profile(
    profile: &[ElevationProfilePoint],
    max_points: usize,
) -> Vec<ElevationProfilePoint> {
    if profile.len() <= max_points {
        return profile.to_vec();
    }
    match max_points {
        0 => Vec::new(),
        1 => vec![profile[0].clone()],
        _ => {
            let last = profile.len() - 1;
            let step = last as f64 / (max_points - 1) as f64;
            (0..max_points)
                .map(|k| {
                    let idx = ((k as f64 * step).round() as usize).min(last);
                    profile[idx].clone()
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{format_km, format_miles, miles_to_km};

    fn profile(distances: &[f64]) -> Vec<ElevationProfilePoint> {
        distances
            .iter()
            .map(|&d| ElevationProfilePoint {
                distance: d,
                elevation: Some(d * 100.0),
                distance_label: format_miles(d),
                distance_km: miles_to_km(d),
                elevation_m: None,
                distance_label_km: format_km(miles_to_km(d)),
            })
            .collect()
    }

    #[test]
    fn test_index_at_distance() {
        let p = profile(&[0.0, 0.5, 1.0, 1.0, 2.0]);
        assert_eq!(profile_index_at_distance(&p, -1.0), Some(0));
        assert_eq!(profile_index_at_distance(&p, 0.2), Some(0));
        assert_eq!(profile_index_at_distance(&p, 0.3), Some(1));
        assert_eq!(profile_index_at_distance(&p, 1.0), Some(2));
        assert_eq!(profile_index_at_distance(&p, 1.6), Some(4));
        assert_eq!(profile_index_at_distance(&p, 99.0), Some(4));
        assert_eq!(profile_index_at_distance(&[], 1.0), None);
        assert_eq!(profile_index_at_distance(&p, f64::NAN), None);
    }

    #[test]
    fn test_nearest_point() {
        let points = vec![
            TrackPoint::new(40.0, -105.0),
            TrackPoint::new(40.01, -105.0),
            TrackPoint::new(40.02, -105.0),
        ];
        assert_eq!(nearest_point_index(&points, 40.011, -105.001), Some(1));
        assert_eq!(nearest_point_index(&points, 50.0, -105.0), Some(2));
        assert_eq!(nearest_point_index(&[], 40.0, -105.0), None);
    }

    #[test]
    fn test_peak_index() {
        let points = vec![
            TrackPoint::new(40.0, -105.0).with_elevation(100.0),
            TrackPoint::new(40.0, -105.0),
            TrackPoint::new(40.0, -105.0).with_elevation(300.0),
            TrackPoint::new(40.0, -105.0).with_elevation(300.0),
        ];
        assert_eq!(peak_index(&points), Some(2));
        assert_eq!(peak_index(&[TrackPoint::new(0.0, 0.0)]), None);
    }

    #[test]
    fn test_downsample_keeps_endpoints() {
        let p = profile(&(0..1000).map(|i| i as f64 * 0.01).collect::<Vec<_>>());
        let thin = downsample_profile(&p, 50);
        assert_eq!(thin.len(), 50);
        assert_eq!(thin.first(), p.first());
        assert_eq!(thin.last(), p.last());
        assert!(thin.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_downsample_small_inputs() {
        let p = profile(&[0.0, 1.0, 2.0]);
        assert_eq!(downsample_profile(&p, 10), p);
        assert_eq!(downsample_profile(&p, 1).len(), 1);
        assert!(downsample_profile(&p, 0).is_empty());
    }
}
