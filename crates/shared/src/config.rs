use serde::Deserialize;

/// Tunables for the map viewport, bottom sheet and region panel.
///
/// Every field has a default, so a partial JSON object (or `{}`) deserializes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    /// Scale at or below which the viewport counts as not zoomed.
    pub zoom_threshold: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale applied when a marker pin is tapped while zoomed out.
    pub focused_scale: f64,
    /// Cosmetic shrink applied on top of the gesture scale.
    pub base_scale: f64,
    /// `k` in `scale *= exp(-deltaY * k)` for ctrl-wheel zoom.
    pub wheel_sensitivity: f64,
    /// Pinch baselines shorter than this (px) hold the previous scale.
    pub min_pinch_distance: f64,
    /// Delay before the transform anchor resets after zoom-out.
    pub origin_reset_delay_ms: u32,
    /// Origin moves smaller than this (percent) do not re-run marker selection.
    pub origin_epsilon: f64,
    pub sheet_min_height: f64,
    pub sheet_max_height: f64,
    /// Net drag distance (px) needed to commit a sheet state change.
    pub sheet_commit_threshold: f64,
    /// Drags that never leave this radius (px) count as taps.
    pub sheet_tap_slop: f64,
    /// Heights within this distance of the max count as expanded mid-drag.
    pub sheet_expanded_slack: f64,
    /// Number of thumbnails shown before the "+N" tile.
    pub thumbnail_capacity: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            zoom_threshold: 1.02,
            min_scale: 1.0,
            max_scale: 2.0,
            focused_scale: 1.5,
            base_scale: 0.85,
            wheel_sensitivity: 0.01,
            min_pinch_distance: 1.0,
            origin_reset_delay_ms: 600,
            origin_epsilon: 0.01,
            sheet_min_height: 40.0,
            sheet_max_height: 516.0,
            sheet_commit_threshold: 30.0,
            sheet_tap_slop: 4.0,
            sheet_expanded_slack: 50.0,
            thumbnail_capacity: 5,
        }
    }
}
