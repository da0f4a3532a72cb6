use log::debug;

use crate::error::{Result, TrackError};
use crate::geo::point_distance_m;
use crate::gpx_types::{ElevationProfilePoint, GpxData, TrackPoint};
use crate::parser::{ParsedTrack, parse_gpx};
use crate::units::{format_km, format_miles, meters_to_feet, meters_to_miles, miles_to_km};

/// Parse GPX content and compute the distance-indexed elevation profile and
/// summary statistics.
///
/// All-or-nothing: any malformed content or bad coordinate fails the whole call.
pub fn parse_track(raw: &str) -> Result<GpxData> {
    let ParsedTrack { name, points } = parse_gpx(raw)?;
    let mut data = analyze(points)?;
    data.name = name;
    Ok(data)
}

/// [`parse_track`] over raw file bytes. The bytes are only read.
pub fn parse_track_bytes(bytes: &[u8]) -> Result<GpxData> {
    parse_track(std::str::from_utf8(bytes)?)
}

/// Compute derived series for points already in track order.
///
/// `cumulative_distance` on the input is overwritten. Single pass over the points.
pub fn analyze(mut points: Vec<TrackPoint>) -> Result<GpxData> {
    if points.is_empty() {
        return Err(TrackError::EmptyTrack);
    }

    let mut distance_m = 0.0;
    let mut gain_m = 0.0;
    let mut loss_m = 0.0;
    let mut max_m: Option<f64> = None;
    let mut min_m: Option<f64> = None;
    let mut start_time = None;
    let mut end_time = None;
    let mut elevation_profile = Vec::with_capacity(points.len());

    for i in 0..points.len() {
        validate_coordinates(i, &points[i])?;

        if i > 0 {
            let (prev, cur) = (&points[i - 1], &points[i]);
            distance_m += point_distance_m(prev, cur);
            if let (Some(a), Some(b)) = (prev.elevation, cur.elevation) {
                let delta = b - a;
                if delta > 0.0 {
                    gain_m += delta;
                } else {
                    loss_m -= delta;
                }
            }
        }

        let point = &mut points[i];
        point.cumulative_distance = meters_to_miles(distance_m);

        if let Some(ele) = point.elevation {
            max_m = Some(max_m.map_or(ele, |m| m.max(ele)));
            min_m = Some(min_m.map_or(ele, |m| m.min(ele)));
        }
        if let Some(ts) = point.timestamp {
            if start_time.is_none() {
                start_time = Some(ts);
            }
            end_time = Some(ts);
        }

        elevation_profile.push(profile_entry(point));
    }

    let total_distance = points[points.len() - 1].cumulative_distance;
    let duration_seconds = match (start_time, end_time) {
        // clock resets can put the last timestamp before the first
        (Some(start), Some(end)) => Some((end - start).num_seconds().max(0)),
        _ => None,
    };

    debug!(
        "analyzed {} points: {:.2} mi, +{:.0} m / -{:.0} m",
        points.len(),
        total_distance,
        gain_m,
        loss_m
    );

    Ok(GpxData {
        name: None,
        points,
        elevation_profile,
        total_distance,
        total_elevation_gain: meters_to_feet(gain_m),
        total_elevation_loss: meters_to_feet(loss_m),
        max_elevation: max_m.map(meters_to_feet),
        min_elevation: min_m.map(meters_to_feet),
        total_distance_km: miles_to_km(total_distance),
        total_elevation_gain_m: gain_m,
        total_elevation_loss_m: loss_m,
        max_elevation_m: max_m,
        min_elevation_m: min_m,
        start_time,
        end_time,
        duration_seconds,
    })
}

fn profile_entry(point: &TrackPoint) -> ElevationProfilePoint {
    let distance = point.cumulative_distance;
    let distance_km = miles_to_km(distance);
    ElevationProfilePoint {
        distance,
        elevation: point.elevation.map(meters_to_feet),
        distance_label: format_miles(distance),
        distance_km,
        elevation_m: point.elevation,
        distance_label_km: format_km(distance_km),
    }
}

fn validate_coordinates(index: usize, point: &TrackPoint) -> Result<()> {
    check_range(index, "lat", point.latitude, 90.0)?;
    check_range(index, "lon", point.longitude, 180.0)
}

fn check_range(index: usize, attribute: &'static str, value: f64, bound: f64) -> Result<()> {
    // NaN fails `contains`
    if (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(TrackError::CoordinateOutOfRange {
            index,
            attribute,
            value,
            min: -bound,
            max: bound,
        })
    }
}
