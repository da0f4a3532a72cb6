use serde::Deserialize;

use crate::geo::DEFAULT_LOOP_TOLERANCE_M;

/// Options for the GeoJSON map export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Include elevation (meters) as the 3rd coordinate value (default: true)
    #[serde(default = "default_true")]
    pub include_elevation: bool,

    /// Emit start/finish/peak Point features (default: true)
    #[serde(default = "default_true")]
    pub include_markers: bool,

    /// Attach summary statistics to the route's properties (default: true)
    #[serde(default = "default_true")]
    pub include_stats: bool,

    /// Start/finish distance under which the route is labelled a loop (default: 50)
    #[serde(default = "default_loop_tolerance")]
    pub loop_tolerance_meters: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_elevation: true,
            include_markers: true,
            include_stats: true,
            loop_tolerance_meters: DEFAULT_LOOP_TOLERANCE_M,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_loop_tolerance() -> f64 {
    DEFAULT_LOOP_TOLERANCE_M
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: ConvertOptions =
            serde_json::from_str(r#"{"includeMarkers": false, "loopToleranceMeters": 120}"#)
                .unwrap();
        assert!(!opts.include_markers);
        assert!(opts.include_elevation);
        assert!(opts.include_stats);
        assert_eq!(opts.loop_tolerance_meters, 120.0);
    }

    #[test]
    fn test_empty_json_matches_default() {
        let opts: ConvertOptions = serde_json::from_str("{}").unwrap();
        let default = ConvertOptions::default();
        assert_eq!(opts.include_elevation, default.include_elevation);
        assert_eq!(opts.loop_tolerance_meters, default.loop_tolerance_meters);
    }
}
