use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded sample along a track, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters. `None` when the source has no usable `<ele>`; never defaulted to sea level.
    pub elevation: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    /// Miles from the first point.
    pub cumulative_distance: f64,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            timestamp: None,
            cumulative_distance: 0.0,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// One chart sample, carried in both unit systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationProfilePoint {
    /// Miles.
    pub distance: f64,
    /// Feet.
    pub elevation: Option<f64>,
    pub distance_label: String,
    pub distance_km: f64,
    pub elevation_m: Option<f64>,
    pub distance_label_km: String,
}

/// Metric view of a profile entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricProfile {
    pub distance_km: f64,
    pub elevation_m: Option<f64>,
    pub distance_label_km: String,
}

/// Imperial view of a profile entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImperialProfile {
    pub distance: f64,
    pub elevation: Option<f64>,
    pub distance_label: String,
}

/// Analyzed track. Built once per load and never mutated afterwards.
///
/// Imperial fields (miles, feet) are the primary representation; every summary
/// statistic also has a metric dual. Elevation extremes are `None` when no
/// point carries elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpxData {
    pub name: Option<String>,
    pub points: Vec<TrackPoint>,
    pub elevation_profile: Vec<ElevationProfilePoint>,
    pub total_distance: f64,
    pub total_elevation_gain: f64,
    pub total_elevation_loss: f64,
    pub max_elevation: Option<f64>,
    pub min_elevation: Option<f64>,
    pub total_distance_km: f64,
    pub total_elevation_gain_m: f64,
    pub total_elevation_loss_m: f64,
    pub max_elevation_m: Option<f64>,
    pub min_elevation_m: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
}

impl GpxData {
    pub fn has_elevation(&self) -> bool {
        self.max_elevation.is_some()
    }
}
