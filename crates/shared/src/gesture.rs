//! Pinch / ctrl-wheel gesture recognizer.
//!
//! Turns raw touch and wheel input into a zoom factor plus a focal origin in
//! map percent space. Knows nothing about markers.

use tracing::debug;

use crate::config::MapConfig;
use crate::geometry::{ClientPoint, MapPoint, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureLimits {
    min_scale: f64,
    max_scale: f64,
    focused_scale: f64,
    wheel_sensitivity: f64,
    min_pinch_distance: f64,
}

impl From<&MapConfig> for GestureLimits {
    fn from(cfg: &MapConfig) -> Self {
        GestureLimits {
            min_scale: cfg.min_scale,
            max_scale: cfg.max_scale,
            focused_scale: cfg.focused_scale,
            wheel_sensitivity: cfg.wheel_sensitivity,
            min_pinch_distance: cfg.min_pinch_distance,
        }
    }
}

/// Distance and scale captured when two fingers land.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchBaseline {
    distance: f64,
    scale: f64,
}

/// What an input event did to the gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureUpdate {
    Ignored,
    PinchStarted,
    Changed,
    PinchEnded,
}

/// Returned by [`GestureState::zoom_out`]. Redeem it with
/// [`GestureState::clear_origin`] once the zoom-out transition has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginReset {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    scale: f64,
    origin: Option<MapPoint>,
    pinch: Option<PinchBaseline>,
    // Bumped by every zoom-in so a stale OriginReset cannot clear a live anchor.
    generation: u64,
    limits: GestureLimits,
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::new(&MapConfig::default())
    }
}

impl GestureState {
    pub fn new(config: &MapConfig) -> Self {
        let limits = GestureLimits::from(config);
        GestureState {
            scale: limits.min_scale,
            origin: None,
            pinch: None,
            generation: 0,
            limits,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `None` means "anchor at the geometric center".
    pub fn origin(&self) -> Option<MapPoint> {
        self.origin
    }

    /// The anchor used for both rendering and marker selection.
    pub fn anchor(&self) -> MapPoint {
        self.origin.unwrap_or(MapPoint::CENTER)
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.limits.min_scale;
        }
        scale.clamp(self.limits.min_scale, self.limits.max_scale)
    }

    /// Fingers landed. Only the transition into exactly two contacts starts a
    /// pinch; extra fingers during a pinch leave the baseline alone.
    pub fn touch_start(&mut self, touches: &[ClientPoint], frame: Rect) -> GestureUpdate {
        if self.pinch.is_some() || touches.len() != 2 {
            return GestureUpdate::Ignored;
        }
        let (a, b) = (touches[0], touches[1]);
        self.pinch = Some(PinchBaseline {
            distance: a.distance(&b),
            scale: self.scale,
        });
        if let Some(mid) = frame.to_map_point(ClientPoint::midpoint(a, b)) {
            self.origin = Some(mid);
        }
        self.generation += 1;
        debug!(scale = self.scale, "pinch started");
        GestureUpdate::PinchStarted
    }

    /// Fingers moved. Scale follows the distance ratio against the baseline;
    /// the origin tracks the live midpoint.
    pub fn touch_move(&mut self, touches: &[ClientPoint], frame: Rect) -> GestureUpdate {
        let Some(baseline) = self.pinch else {
            return GestureUpdate::Ignored;
        };
        if touches.len() < 2 {
            return GestureUpdate::Ignored;
        }
        let (a, b) = (touches[0], touches[1]);

        // A degenerate baseline has no usable ratio: hold the scale.
        if baseline.distance >= self.limits.min_pinch_distance {
            let ratio = a.distance(&b) / baseline.distance;
            self.scale = self.clamp_scale(baseline.scale * ratio);
        }
        if let Some(mid) = frame.to_map_point(ClientPoint::midpoint(a, b)) {
            self.origin = Some(mid);
        }
        GestureUpdate::Changed
    }

    /// Fingers lifted; `remaining` is the number still touching. The pinch ends
    /// when fewer than two remain. Scale and origin stay where they were.
    pub fn touch_end(&mut self, remaining: usize) -> GestureUpdate {
        if self.pinch.is_none() || remaining >= 2 {
            return GestureUpdate::Ignored;
        }
        self.pinch = None;
        debug!(scale = self.scale, "pinch ended");
        GestureUpdate::PinchEnded
    }

    /// Ctrl-modified (trackpad pinch) wheel zoom. Plain wheel events belong to
    /// page scroll and are ignored. `delta_y` is in pixels.
    pub fn wheel(
        &mut self,
        delta_y: f64,
        ctrl: bool,
        pointer: ClientPoint,
        frame: Rect,
    ) -> GestureUpdate {
        if !ctrl || !delta_y.is_finite() {
            return GestureUpdate::Ignored;
        }
        let factor = (-delta_y * self.limits.wheel_sensitivity).exp();
        self.scale = self.clamp_scale(self.scale * factor);
        if let Some(p) = frame.to_map_point(pointer) {
            self.origin = Some(p);
        }
        self.generation += 1;
        GestureUpdate::Changed
    }

    /// Jump straight to the focused scale anchored on `position`.
    pub fn focus(&mut self, position: MapPoint) {
        self.origin = Some(position);
        self.scale = self.clamp_scale(self.limits.focused_scale);
        self.pinch = None;
        self.generation += 1;
    }

    /// Move the anchor to `position` without touching the scale.
    pub fn retarget(&mut self, position: MapPoint) {
        self.origin = Some(position);
        self.generation += 1;
    }

    /// Reset the scale immediately. The origin stays put until the returned
    /// token is redeemed so the transition animates around the same anchor.
    pub fn zoom_out(&mut self) -> OriginReset {
        self.scale = self.limits.min_scale;
        self.pinch = None;
        self.generation += 1;
        OriginReset {
            generation: self.generation,
        }
    }

    /// Clear the origin if nothing zoomed in since `token` was issued.
    pub fn clear_origin(&mut self, token: OriginReset) -> bool {
        if token.generation != self.generation {
            return false;
        }
        self.origin = None;
        true
    }

    /// Drop the anchor right away, for a gesture that settled without
    /// zooming. Outstanding reset tokens are voided.
    pub fn recenter(&mut self) {
        self.origin = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 800.0)
    }

    fn pts(a: (f64, f64), b: (f64, f64)) -> Vec<ClientPoint> {
        vec![ClientPoint::new(a.0, a.1), ClientPoint::new(b.0, b.1)]
    }

    #[test]
    fn test_initial_state() {
        let g = GestureState::default();
        assert_eq!(g.scale(), 1.0);
        assert!(g.origin().is_none());
        assert!(!g.is_pinching());
        assert_eq!(g.anchor(), MapPoint::CENTER);
    }

    #[test]
    fn test_pinch_start_sets_origin_to_midpoint() {
        let mut g = GestureState::default();
        let update = g.touch_start(&pts((200.0, 300.0), (280.0, 340.0)), frame());
        assert_eq!(update, GestureUpdate::PinchStarted);
        assert!(g.is_pinching());
        let o = g.origin().unwrap();
        assert!((o.left - 60.0).abs() < 1e-9);
        assert!((o.top - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_move_scales_by_ratio() {
        let mut g = GestureState::default();
        g.touch_start(&pts((100.0, 100.0), (200.0, 100.0)), frame());
        g.touch_move(&pts((80.0, 100.0), (230.0, 100.0)), frame());
        assert!((g.scale() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_move_tracks_midpoint() {
        let mut g = GestureState::default();
        g.touch_start(&pts((100.0, 100.0), (200.0, 100.0)), frame());
        g.touch_move(&pts((200.0, 400.0), (300.0, 400.0)), frame());
        let o = g.origin().unwrap();
        assert!((o.left - 62.5).abs() < 1e-9);
        assert!((o.top - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_uses_scale_at_start_as_baseline() {
        let mut g = GestureState::default();
        g.touch_start(&pts((100.0, 100.0), (200.0, 100.0)), frame());
        g.touch_move(&pts((100.0, 100.0), (250.0, 100.0)), frame());
        g.touch_end(0);
        assert!((g.scale() - 1.5).abs() < 1e-9);

        // second pinch starts from 1.5
        g.touch_start(&pts((100.0, 100.0), (200.0, 100.0)), frame());
        g.touch_move(&pts((100.0, 100.0), (220.0, 100.0)), frame());
        assert!((g.scale() - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_end_keeps_scale_and_origin() {
        let mut g = GestureState::default();
        g.touch_start(&pts((100.0, 100.0), (200.0, 100.0)), frame());
        g.touch_move(&pts((50.0, 100.0), (250.0, 100.0)), frame());
        let origin = g.origin();
        assert_eq!(g.touch_end(0), GestureUpdate::PinchEnded);
        assert!(!g.is_pinching());
        assert_eq!(g.scale(), 2.0);
        assert_eq!(g.origin(), origin);
    }

    #[test]
    fn test_third_finger_does_not_restart_baseline() {
        let mut g = GestureState::default();
        g.touch_start(&pts((100.0, 100.0), (200.0, 100.0)), frame());
        g.touch_move(&pts((100.0, 100.0), (250.0, 100.0)), frame());

        let mut three = pts((100.0, 100.0), (250.0, 100.0));
        three.push(ClientPoint::new(300.0, 300.0));
        assert_eq!(g.touch_start(&three, frame()), GestureUpdate::Ignored);

        // Still measured against the first 100px baseline
        g.touch_move(&three, frame());
        assert!((g.scale() - 1.5).abs() < 1e-9);

        // Lifting the third finger leaves two: pinch continues
        assert_eq!(g.touch_end(2), GestureUpdate::Ignored);
        assert!(g.is_pinching());
    }

    #[test]
    fn test_single_finger_is_not_a_pinch() {
        let mut g = GestureState::default();
        let one = vec![ClientPoint::new(10.0, 10.0)];
        assert_eq!(g.touch_start(&one, frame()), GestureUpdate::Ignored);
        assert_eq!(g.touch_move(&one, frame()), GestureUpdate::Ignored);
        assert_eq!(g.touch_end(0), GestureUpdate::Ignored);
        assert_eq!(g.scale(), 1.0);
    }

    #[test]
    fn test_zero_distance_baseline_holds_scale() {
        let mut g = GestureState::default();
        g.touch_start(&pts((150.0, 150.0), (150.0, 150.0)), frame());
        let update = g.touch_move(&pts((100.0, 150.0), (300.0, 150.0)), frame());
        assert_eq!(update, GestureUpdate::Changed);
        assert_eq!(g.scale(), 1.0);
        assert!(g.scale().is_finite());
        // origin still follows the fingers
        assert!((g.origin().unwrap().left - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_scale_always_clamped() {
        let ratios = [0.0, 1e-9, 0.3, 1.0, 1.7, 3.0, 1e6, 1e300];
        for &r in &ratios {
            let mut g = GestureState::default();
            g.touch_start(&pts((0.0, 0.0), (100.0, 0.0)), frame());
            g.touch_move(&pts((0.0, 0.0), (100.0 * r, 0.0)), frame());
            assert!(
                (1.0..=2.0).contains(&g.scale()),
                "ratio {r} produced scale {}",
                g.scale()
            );
        }
    }

    #[test]
    fn test_wheel_requires_ctrl() {
        let mut g = GestureState::default();
        let update = g.wheel(-50.0, false, ClientPoint::new(10.0, 10.0), frame());
        assert_eq!(update, GestureUpdate::Ignored);
        assert_eq!(g.scale(), 1.0);
        assert!(g.origin().is_none());
    }

    #[test]
    fn test_wheel_exponential_zoom() {
        let mut g = GestureState::default();
        g.wheel(-50.0, true, ClientPoint::new(200.0, 400.0), frame());
        let expected = (0.5f64).exp();
        assert!((g.scale() - expected).abs() < 1e-9);
        let o = g.origin().unwrap();
        assert!((o.left - 50.0).abs() < 1e-9);
        assert!((o.top - 50.0).abs() < 1e-9);

        // scrolling back down by the same amount returns to 1
        g.wheel(50.0, true, ClientPoint::new(200.0, 400.0), frame());
        assert!((g.scale() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_scale_always_clamped() {
        let deltas = [-1e9, -5000.0, -70.0, -1.0, 0.0, 1.0, 70.0, 5000.0, 1e9];
        let mut g = GestureState::default();
        for &d in &deltas {
            g.wheel(d, true, ClientPoint::new(1.0, 1.0), frame());
            assert!((1.0..=2.0).contains(&g.scale()), "delta {d} -> {}", g.scale());
        }
    }

    #[test]
    fn test_wheel_ignores_non_finite_delta() {
        let mut g = GestureState::default();
        assert_eq!(
            g.wheel(f64::NAN, true, ClientPoint::new(1.0, 1.0), frame()),
            GestureUpdate::Ignored
        );
        assert_eq!(g.scale(), 1.0);
    }

    #[test]
    fn test_focus_jumps_to_focused_scale() {
        let mut g = GestureState::default();
        g.focus(MapPoint::new(80.0, 55.0));
        assert_eq!(g.scale(), 1.5);
        assert_eq!(g.origin(), Some(MapPoint::new(80.0, 55.0)));
    }

    #[test]
    fn test_retarget_keeps_scale() {
        let mut g = GestureState::default();
        g.wheel(-30.0, true, ClientPoint::new(100.0, 100.0), frame());
        let scale = g.scale();
        g.retarget(MapPoint::new(10.0, 20.0));
        assert_eq!(g.scale(), scale);
        assert_eq!(g.origin(), Some(MapPoint::new(10.0, 20.0)));
    }

    #[test]
    fn test_zoom_out_defers_origin_clear() {
        let mut g = GestureState::default();
        g.focus(MapPoint::new(80.0, 55.0));
        let token = g.zoom_out();
        assert_eq!(g.scale(), 1.0);
        assert!(g.origin().is_some());
        assert!(g.clear_origin(token));
        assert!(g.origin().is_none());
    }

    #[test]
    fn test_zoom_in_during_reset_delay_cancels_clear() {
        let mut g = GestureState::default();
        g.focus(MapPoint::new(80.0, 55.0));
        let token = g.zoom_out();
        g.focus(MapPoint::new(20.0, 30.0));
        assert!(!g.clear_origin(token));
        assert_eq!(g.origin(), Some(MapPoint::new(20.0, 30.0)));
    }

    #[test]
    fn test_recenter_voids_pending_reset() {
        let mut g = GestureState::default();
        g.focus(MapPoint::new(80.0, 55.0));
        let token = g.zoom_out();
        g.recenter();
        assert!(g.origin().is_none());
        assert!(!g.clear_origin(token));
        assert_eq!(g.scale(), 1.0);
    }

    #[test]
    fn test_zoom_out_ends_pinch() {
        let mut g = GestureState::default();
        g.touch_start(&pts((0.0, 0.0), (100.0, 0.0)), frame());
        g.zoom_out();
        assert!(!g.is_pinching());
        assert_eq!(g.touch_move(&pts((0.0, 0.0), (200.0, 0.0)), frame()), GestureUpdate::Ignored);
    }
}
