//! Zoom state machine: decides when the map counts as zoomed and which marker
//! is active while it is.

use tracing::debug;

use crate::config::MapConfig;
use crate::geometry::MapPoint;
use crate::gesture::GestureState;
use crate::markers::MarkerIndex;
use crate::models::MarkerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPhase {
    Idle,
    Zoomed,
}

/// Values up to and including `threshold` are idle.
pub fn classify(scale: f64, threshold: f64) -> ZoomPhase {
    if scale > threshold {
        ZoomPhase::Zoomed
    } else {
        ZoomPhase::Idle
    }
}

/// How the current zoom was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomEntry {
    /// Pinch or ctrl-wheel.
    Gesture,
    /// Tap on a marker pin.
    Focused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    Idle,
    Zoomed { active: MarkerId, entry: ZoomEntry },
}

/// Emitted whenever the active marker changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub marker_id: Option<MarkerId>,
    pub region: Option<String>,
}

impl SelectionChange {
    fn cleared() -> Self {
        SelectionChange {
            marker_id: None,
            region: None,
        }
    }

    fn to(id: MarkerId, markers: &MarkerIndex) -> Self {
        SelectionChange {
            marker_id: Some(id),
            region: markers.get(id).map(|m| m.region_name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomController {
    state: ZoomState,
    threshold: f64,
    origin_epsilon: f64,
    // Anchor the active marker was last chosen for.
    queried_at: Option<MapPoint>,
}

impl Default for ZoomController {
    fn default() -> Self {
        ZoomController::new(&MapConfig::default())
    }
}

impl ZoomController {
    pub fn new(config: &MapConfig) -> Self {
        ZoomController {
            state: ZoomState::Idle,
            threshold: config.zoom_threshold,
            origin_epsilon: config.origin_epsilon,
            queried_at: None,
        }
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn phase(&self) -> ZoomPhase {
        match self.state {
            ZoomState::Idle => ZoomPhase::Idle,
            ZoomState::Zoomed { .. } => ZoomPhase::Zoomed,
        }
    }

    pub fn active(&self) -> Option<MarkerId> {
        match self.state {
            ZoomState::Idle => None,
            ZoomState::Zoomed { active, .. } => Some(active),
        }
    }

    pub fn entry(&self) -> Option<ZoomEntry> {
        match self.state {
            ZoomState::Idle => None,
            ZoomState::Zoomed { entry, .. } => Some(entry),
        }
    }

    /// React to a pinch or wheel update.
    ///
    /// Crossing the threshold enters or leaves the zoomed state right away,
    /// even mid-pinch. Re-selecting on origin changes waits until the pinch is
    /// over; the first update after it ends catches up.
    pub fn on_gesture(
        &mut self,
        gesture: &GestureState,
        markers: &MarkerIndex,
    ) -> Option<SelectionChange> {
        let anchor = gesture.anchor();
        match (classify(gesture.scale(), self.threshold), self.state) {
            (ZoomPhase::Idle, ZoomState::Idle) => None,
            (ZoomPhase::Idle, ZoomState::Zoomed { .. }) => {
                debug!(scale = gesture.scale(), "zoom dropped below threshold");
                self.reset()
            }
            (ZoomPhase::Zoomed, ZoomState::Idle) => {
                let Some(id) = markers.nearest(anchor) else {
                    debug!("zoomed with no markers, staying idle");
                    return None;
                };
                debug!(marker = %id, scale = gesture.scale(), "entered zoom");
                self.state = ZoomState::Zoomed {
                    active: id,
                    entry: ZoomEntry::Gesture,
                };
                self.queried_at = Some(anchor);
                Some(SelectionChange::to(id, markers))
            }
            (ZoomPhase::Zoomed, ZoomState::Zoomed { active, .. }) => {
                self.state = ZoomState::Zoomed {
                    active,
                    entry: ZoomEntry::Gesture,
                };
                if gesture.is_pinching() {
                    return None;
                }
                let moved = self
                    .queried_at
                    .map_or(true, |q| anchor.moved_from(&q, self.origin_epsilon));
                if !moved {
                    return None;
                }
                self.requery(anchor, markers)
            }
        }
    }

    /// Explicit selection of a tapped marker. Bypasses the proximity query.
    pub fn focus_marker(&mut self, id: MarkerId, markers: &MarkerIndex) -> Option<SelectionChange> {
        let marker = markers.get(id)?;
        let previous = self.active();
        self.state = ZoomState::Zoomed {
            active: id,
            entry: ZoomEntry::Focused,
        };
        self.queried_at = Some(marker.position);
        debug!(marker = %id, region = %marker.region_name, "marker focused");
        (previous != Some(id)).then(|| SelectionChange::to(id, markers))
    }

    pub fn zoom_out(&mut self) -> Option<SelectionChange> {
        self.reset()
    }

    /// The marker set was rebuilt. Keep the active marker if it still exists,
    /// otherwise fall back to whatever is nearest now.
    pub fn markers_refreshed(
        &mut self,
        gesture: &GestureState,
        markers: &MarkerIndex,
    ) -> Option<SelectionChange> {
        let ZoomState::Zoomed { active, .. } = self.state else {
            return None;
        };
        if markers.get(active).is_some() {
            return None;
        }
        self.requery(gesture.anchor(), markers)
    }

    fn requery(&mut self, anchor: MapPoint, markers: &MarkerIndex) -> Option<SelectionChange> {
        let ZoomState::Zoomed { active, entry } = self.state else {
            return None;
        };
        self.queried_at = Some(anchor);
        match markers.nearest(anchor) {
            Some(id) if id == active => None,
            Some(id) => {
                debug!(from = %active, to = %id, "active marker changed");
                self.state = ZoomState::Zoomed { active: id, entry };
                Some(SelectionChange::to(id, markers))
            }
            None => self.reset(),
        }
    }

    fn reset(&mut self) -> Option<SelectionChange> {
        self.queried_at = None;
        match std::mem::replace(&mut self.state, ZoomState::Idle) {
            ZoomState::Idle => None,
            ZoomState::Zoomed { .. } => Some(SelectionChange::cleared()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ClientPoint, Rect};
    use crate::models::Marker;

    fn marker(id: u32, name: &str, top: f64, left: f64) -> Marker {
        Marker {
            id: MarkerId(id),
            position: MapPoint::new(top, left),
            geo: None,
            region_name: name.to_string(),
            color: None,
            photo: None,
            icon: None,
        }
    }

    fn index() -> MarkerIndex {
        MarkerIndex::new(vec![
            marker(1, "수원시", 20.0, 20.0),
            marker(2, "고양시", 80.0, 80.0),
            marker(3, "성남시", 50.0, 50.0),
        ])
    }

    fn frame() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn wheel_to(g: &mut GestureState, dy: f64, x: f64, y: f64) {
        g.wheel(dy, true, ClientPoint::new(x, y), frame());
    }

    #[test]
    fn test_threshold_boundary() {
        for s in [1.0, 1.005, 1.01, 1.019, 1.02] {
            assert_eq!(classify(s, 1.02), ZoomPhase::Idle, "scale {s}");
        }
        for s in [1.021, 1.03, 1.5, 2.0] {
            assert_eq!(classify(s, 1.02), ZoomPhase::Zoomed, "scale {s}");
        }
    }

    #[test]
    fn test_controller_respects_threshold() {
        let markers = index();
        let mut g = GestureState::default();
        let mut z = ZoomController::default();

        // exp(0.0198) ~ 1.01999, still idle
        wheel_to(&mut g, -1.98, 50.0, 50.0);
        assert!(g.scale() <= 1.02);
        assert_eq!(z.on_gesture(&g, &markers), None);
        assert_eq!(z.phase(), ZoomPhase::Idle);

        // pushes past 1.021
        wheel_to(&mut g, -0.2, 50.0, 50.0);
        assert!(g.scale() > 1.021);
        let change = z.on_gesture(&g, &markers).unwrap();
        assert_eq!(change.marker_id, Some(MarkerId(3)));
        assert_eq!(change.region.as_deref(), Some("성남시"));
        assert_eq!(z.entry(), Some(ZoomEntry::Gesture));
    }

    #[test]
    fn test_entry_uses_center_without_origin() {
        let markers = index();
        let mut g = GestureState::default();
        g.focus(MapPoint::new(90.0, 90.0));
        let token = g.zoom_out();
        g.clear_origin(token);
        assert!(g.origin().is_none());

        // Fake a zoom with no origin by pinching with a degenerate frame
        let mut z = ZoomController::default();
        g.touch_start(
            &[ClientPoint::new(0.0, 0.0), ClientPoint::new(10.0, 0.0)],
            Rect::new(0.0, 0.0, 0.0, 0.0),
        );
        g.touch_move(
            &[ClientPoint::new(0.0, 0.0), ClientPoint::new(20.0, 0.0)],
            Rect::new(0.0, 0.0, 0.0, 0.0),
        );
        assert!(g.origin().is_none());
        let change = z.on_gesture(&g, &markers).unwrap();
        assert_eq!(change.marker_id, Some(MarkerId(3)));
    }

    #[test]
    fn test_empty_markers_stay_idle() {
        let markers = MarkerIndex::default();
        let mut g = GestureState::default();
        let mut z = ZoomController::default();
        wheel_to(&mut g, -70.0, 50.0, 50.0);
        assert_eq!(z.on_gesture(&g, &markers), None);
        assert_eq!(z.state(), ZoomState::Idle);
    }

    #[test]
    fn test_origin_change_reselects_when_not_pinching() {
        let markers = index();
        let mut g = GestureState::default();
        let mut z = ZoomController::default();
        wheel_to(&mut g, -50.0, 50.0, 50.0);
        z.on_gesture(&g, &markers);
        assert_eq!(z.active(), Some(MarkerId(3)));

        wheel_to(&mut g, -1.0, 15.0, 25.0);
        let change = z.on_gesture(&g, &markers).unwrap();
        assert_eq!(change.marker_id, Some(MarkerId(1)));
    }

    #[test]
    fn test_reselection_deferred_until_pinch_end() {
        let markers = index();
        let mut g = GestureState::default();
        let mut z = ZoomController::default();
        let start = [ClientPoint::new(40.0, 50.0), ClientPoint::new(60.0, 50.0)];

        g.touch_start(&start, frame());
        z.on_gesture(&g, &markers);
        g.touch_move(&[ClientPoint::new(30.0, 50.0), ClientPoint::new(70.0, 50.0)], frame());
        // entering zoom happens mid-pinch
        let change = z.on_gesture(&g, &markers).unwrap();
        assert_eq!(change.marker_id, Some(MarkerId(3)));

        // fingers slide toward marker 2; selection waits
        g.touch_move(&[ClientPoint::new(60.0, 80.0), ClientPoint::new(100.0, 80.0)], frame());
        assert_eq!(z.on_gesture(&g, &markers), None);
        assert_eq!(z.active(), Some(MarkerId(3)));

        g.touch_end(1);
        let change = z.on_gesture(&g, &markers).unwrap();
        assert_eq!(change.marker_id, Some(MarkerId(2)));
    }

    #[test]
    fn test_drop_below_threshold_clears() {
        let markers = index();
        let mut g = GestureState::default();
        let mut z = ZoomController::default();
        wheel_to(&mut g, -50.0, 50.0, 50.0);
        z.on_gesture(&g, &markers);
        wheel_to(&mut g, 500.0, 50.0, 50.0);
        let change = z.on_gesture(&g, &markers).unwrap();
        assert_eq!(change, SelectionChange::cleared());
        assert_eq!(z.state(), ZoomState::Idle);
    }

    #[test]
    fn test_focus_marker_bypasses_proximity() {
        let markers = index();
        let mut z = ZoomController::default();
        let change = z.focus_marker(MarkerId(2), &markers).unwrap();
        assert_eq!(change.region.as_deref(), Some("고양시"));
        assert_eq!(z.entry(), Some(ZoomEntry::Focused));

        // same marker again: no change
        assert_eq!(z.focus_marker(MarkerId(2), &markers), None);
        // unknown id is ignored
        assert_eq!(z.focus_marker(MarkerId(99), &markers), None);
        assert_eq!(z.active(), Some(MarkerId(2)));
    }

    #[test]
    fn test_zoom_out_clears_only_when_zoomed() {
        let markers = index();
        let mut z = ZoomController::default();
        assert_eq!(z.zoom_out(), None);
        z.focus_marker(MarkerId(1), &markers);
        assert_eq!(z.zoom_out(), Some(SelectionChange::cleared()));
        assert_eq!(z.active(), None);
    }

    #[test]
    fn test_markers_refreshed_requeries_when_active_vanishes() {
        let mut g = GestureState::default();
        let mut z = ZoomController::default();
        let markers = index();
        g.focus(MapPoint::new(55.0, 55.0));
        z.focus_marker(MarkerId(3), &markers);

        // still present: nothing happens
        assert_eq!(z.markers_refreshed(&g, &markers), None);

        let smaller = MarkerIndex::new(vec![marker(2, "고양시", 80.0, 80.0)]);
        let change = z.markers_refreshed(&g, &smaller).unwrap();
        assert_eq!(change.marker_id, Some(MarkerId(2)));
        assert_eq!(z.entry(), Some(ZoomEntry::Focused));

        let change = z.markers_refreshed(&g, &MarkerIndex::default()).unwrap();
        assert_eq!(change, SelectionChange::cleared());
        assert_eq!(z.state(), ZoomState::Idle);
    }
}
