//! GPX track analysis: parse a track, accumulate haversine distance, and build
//! a distance-indexed elevation profile with summary statistics in both
//! imperial and metric units.
//!
//! The Rust API lives in the modules below; the `#[wasm_bindgen]` functions in
//! this file expose it to JavaScript with camelCase objects. Errors thrown to
//! JavaScript are `Error`s named `MalformedTrackError` or
//! `InvalidCoordinateError`.

pub mod analyzer;
pub mod converter;
pub mod error;
pub mod geo;
pub mod gpx_types;
pub mod options;
pub mod parser;
pub mod profile;
pub mod units;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

pub use crate::analyzer::{analyze, parse_track, parse_track_bytes};
pub use crate::error::{ErrorKind, Result, TrackError};
pub use crate::gpx_types::{
    ElevationProfilePoint, GpxData, ImperialProfile, MetricProfile, TrackPoint,
};

use crate::options::ConvertOptions;

/// Analyze GPX text, returned as a JS object.
#[wasm_bindgen(js_name = parseTrack)]
pub fn parse_track_js(gpx_string: &str) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let data = analyzer::parse_track(gpx_string)?;
    to_js(&data)
}

/// Analyze GPX text, returned as a JSON string.
#[wasm_bindgen(js_name = parseTrackString)]
pub fn parse_track_string(gpx_string: &str) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let data = analyzer::parse_track(gpx_string)?;
    serde_json::to_string(&data).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Analyze raw GPX file bytes (e.g. a `Uint8Array` from a fetch response).
#[wasm_bindgen(js_name = parseTrackBytes)]
pub fn parse_track_bytes_js(bytes: &[u8]) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let data = analyzer::parse_track_bytes(bytes)?;
    to_js(&data)
}

/// Analyze GPX text and convert it to a GeoJSON FeatureCollection for the map.
#[wasm_bindgen(js_name = trackToGeoJson)]
pub fn track_to_geojson(gpx_string: &str, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let data = analyzer::parse_track(gpx_string)?;
    let fc = converter::to_feature_collection(&data, &opts);
    to_js(&fc)
}

#[wasm_bindgen(js_name = toMetric)]
pub fn to_metric_js(point: JsValue) -> std::result::Result<JsValue, JsValue> {
    let point: ElevationProfilePoint = from_js(point)?;
    to_js(&units::to_metric(&point))
}

#[wasm_bindgen(js_name = toImperial)]
pub fn to_imperial_js(point: JsValue) -> std::result::Result<JsValue, JsValue> {
    let point: MetricProfile = from_js(point)?;
    to_js(&units::to_imperial(&point))
}

/// Chart hover: profile index nearest `distance` miles.
#[wasm_bindgen(js_name = profileIndexAtDistance)]
pub fn profile_index_at_distance(
    profile: JsValue,
    distance: f64,
) -> std::result::Result<Option<u32>, JsValue> {
    let profile: Vec<ElevationProfilePoint> = from_js(profile)?;
    Ok(crate::profile::profile_index_at_distance(&profile, distance).map(|i| i as u32))
}

/// Map hover: point index nearest a coordinate.
#[wasm_bindgen(js_name = nearestPointIndex)]
pub fn nearest_point_index(
    points: JsValue,
    latitude: f64,
    longitude: f64,
) -> std::result::Result<Option<u32>, JsValue> {
    let points: Vec<TrackPoint> = from_js(points)?;
    Ok(crate::profile::nearest_point_index(&points, latitude, longitude).map(|i| i as u32))
}

#[wasm_bindgen(js_name = downsampleProfile)]
pub fn downsample_profile(
    profile: JsValue,
    max_points: usize,
) -> std::result::Result<JsValue, JsValue> {
    let profile: Vec<ElevationProfilePoint> = from_js(profile)?;
    to_js(&crate::profile::downsample_profile(&profile, max_points))
}

/// Plain objects and `null` for missing values, matching the JSON entry point.
fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> std::result::Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> std::result::Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ConvertOptions::default())
    } else {
        from_js(options)
    }
}
