use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::geo::is_loop;
use crate::gpx_types::{GpxData, TrackPoint};
use crate::options::ConvertOptions;
use crate::profile::peak_index;

/// Convert an analyzed track to a GeoJSON FeatureCollection for the map.
///
/// The route comes first (a `LineString`, or a `Point` for single-point
/// tracks), followed by marker points tagged with a `marker` property.
pub fn to_feature_collection(data: &GpxData, opts: &ConvertOptions) -> FeatureCollection {
    let mut features = Vec::new();

    if let Some(route) = route_feature(data, opts) {
        features.push(route);
    }

    if opts.include_markers {
        features.extend(marker_features(data, opts));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn route_feature(data: &GpxData, opts: &ConvertOptions) -> Option<Feature> {
    let geometry = match data.points.as_slice() {
        [] => return None,
        [only] => Value::Point(point_coords(only, opts.include_elevation)),
        points => Value::LineString(
            points
                .iter()
                .map(|pt| point_coords(pt, opts.include_elevation))
                .collect(),
        ),
    };

    let mut props = Map::new();
    props.insert("gpxType".to_string(), JsonValue::String("track".to_string()));
    insert_optional_str(&mut props, "name", data.name.as_deref());
    props.insert(
        "isLoop".to_string(),
        JsonValue::Bool(is_loop(&data.points, opts.loop_tolerance_meters)),
    );

    if opts.include_stats {
        insert_f64(&mut props, "totalDistance", Some(data.total_distance));
        insert_f64(&mut props, "totalDistanceKm", Some(data.total_distance_km));
        insert_f64(&mut props, "totalElevationGain", Some(data.total_elevation_gain));
        insert_f64(&mut props, "totalElevationGainM", Some(data.total_elevation_gain_m));
        insert_f64(&mut props, "maxElevation", data.max_elevation);
        insert_f64(&mut props, "minElevation", data.min_elevation);
        insert_f64(&mut props, "maxElevationM", data.max_elevation_m);
        insert_f64(&mut props, "minElevationM", data.min_elevation_m);
    }

    Some(feature(geometry, props))
}

fn marker_features(data: &GpxData, opts: &ConvertOptions) -> Vec<Feature> {
    let (Some(first), Some(last)) = (data.points.first(), data.points.last()) else {
        return Vec::new();
    };

    let mut markers = Vec::new();
    if is_loop(&data.points, opts.loop_tolerance_meters) {
        markers.push(marker("start-finish", first, 0, opts));
    } else {
        markers.push(marker("start", first, 0, opts));
        if data.points.len() > 1 {
            markers.push(marker("finish", last, data.points.len() - 1, opts));
        }
    }

    if let Some(idx) = peak_index(&data.points) {
        markers.push(marker("peak", &data.points[idx], idx, opts));
    }

    markers
}

fn marker(kind: &str, pt: &TrackPoint, index: usize, opts: &ConvertOptions) -> Feature {
    let mut props = Map::new();
    props.insert("marker".to_string(), JsonValue::String(kind.to_string()));
    props.insert("index".to_string(), JsonValue::from(index));
    insert_f64(&mut props, "distance", Some(pt.cumulative_distance));
    insert_f64(&mut props, "ele", pt.elevation);
    feature(Value::Point(point_coords(pt, opts.include_elevation)), props)
}

fn feature(value: Value, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// GeoJSON order: `[lon, lat]` or `[lon, lat, ele]`.
fn point_coords(pt: &TrackPoint, include_elevation: bool) -> Vec<f64> {
    match pt.elevation {
        Some(ele) if include_elevation => vec![pt.longitude, pt.latitude, ele],
        _ => vec![pt.longitude, pt.latitude],
    }
}

fn insert_optional_str(props: &mut Map<String, JsonValue>, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        props.insert(key.to_string(), JsonValue::String(v.to_string()));
    }
}

/// Non-finite and missing values are omitted.
fn insert_f64(props: &mut Map<String, JsonValue>, key: &str, value: Option<f64>) {
    if let Some(n) = value.and_then(serde_json::Number::from_f64) {
        props.insert(key.to_string(), JsonValue::Number(n));
    }
}
