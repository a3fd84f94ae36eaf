//! One map screen's worth of state.
//!
//! `MapSession` routes input through the gesture recognizer and the zoom state
//! machine, and forwards selection changes to the sheet and the photo panel.
//! Methods that can change the selection return the [`RegionRequest`] the
//! caller has to run.

use tracing::debug;

use crate::config::MapConfig;
use crate::error::ApiError;
use crate::geometry::{ClientPoint, Rect};
use crate::gesture::{GestureState, GestureUpdate, OriginReset};
use crate::markers::MarkerIndex;
use crate::models::{ExternalMarker, MapPhoto, Marker, MarkerId, PhotoScope};
use crate::panel::{RegionContentPanel, RegionRequest};
use crate::regions;
use crate::sheet::BottomSheetController;
use crate::viewport::{self, ViewportTransform};
use crate::zoom::{self, SelectionChange, ZoomController, ZoomEntry, ZoomPhase};

#[derive(Debug, Clone, PartialEq)]
pub struct MapSession {
    config: MapConfig,
    defaults: Vec<Marker>,
    markers: MarkerIndex,
    gesture: GestureState,
    zoom: ZoomController,
    sheet: BottomSheetController,
    panel: RegionContentPanel,
}

impl MapSession {
    /// Session over the regional catalog.
    pub fn new(scope: PhotoScope, config: MapConfig) -> Self {
        MapSession::with_defaults(scope, config, regions::default_markers())
    }

    pub fn with_defaults(scope: PhotoScope, config: MapConfig, defaults: Vec<Marker>) -> Self {
        MapSession {
            markers: MarkerIndex::new(defaults.clone()),
            gesture: GestureState::new(&config),
            zoom: ZoomController::new(&config),
            sheet: BottomSheetController::new(&config),
            panel: RegionContentPanel::new(scope, &config),
            defaults,
            config,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn markers(&self) -> &MarkerIndex {
        &self.markers
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn sheet(&self) -> &BottomSheetController {
        &self.sheet
    }

    /// The sheet has no coupling back into the map, so drag and outside-tap
    /// input goes to it directly.
    pub fn sheet_mut(&mut self) -> &mut BottomSheetController {
        &mut self.sheet
    }

    pub fn panel(&self) -> &RegionContentPanel {
        &self.panel
    }

    pub fn active_marker(&self) -> Option<&Marker> {
        self.zoom.active().and_then(|id| self.markers.get(id))
    }

    pub fn transform(&self) -> ViewportTransform {
        ViewportTransform::compute(
            self.gesture.scale(),
            self.gesture.origin(),
            self.config.base_scale,
        )
    }

    pub fn counter_scale(&self) -> f64 {
        viewport::counter_scale(self.gesture.scale())
    }

    fn apply(&mut self, change: Option<SelectionChange>) -> Option<RegionRequest> {
        let change = change?;
        debug!(marker = ?change.marker_id, region = ?change.region, "selection changed");
        match change.region {
            Some(region) => {
                self.sheet.force_expand(Some(region.clone()));
                self.panel.select(Some(region))
            }
            None => {
                self.sheet.clear_region();
                self.panel.clear();
                None
            }
        }
    }

    fn after_gesture(&mut self, update: GestureUpdate) -> Option<RegionRequest> {
        if update == GestureUpdate::Ignored {
            return None;
        }
        // A settled gesture that stays below the threshold is not a zoom, so
        // the layer goes back to scaling around its center.
        if !self.gesture.is_pinching()
            && zoom::classify(self.gesture.scale(), self.config.zoom_threshold) == ZoomPhase::Idle
        {
            self.gesture.recenter();
        }
        let change = self.zoom.on_gesture(&self.gesture, &self.markers);
        self.apply(change)
    }

    /// Rebuild the marker set from the latest external markers.
    pub fn set_external_markers(&mut self, external: &[ExternalMarker]) -> Option<RegionRequest> {
        self.markers = MarkerIndex::merge(&self.defaults, external);
        debug!(count = self.markers.len(), "markers merged");
        let change = self.zoom.markers_refreshed(&self.gesture, &self.markers);
        self.apply(change)
    }

    pub fn touch_start(&mut self, touches: &[ClientPoint], frame: Rect) -> Option<RegionRequest> {
        let update = self.gesture.touch_start(touches, frame);
        self.after_gesture(update)
    }

    pub fn touch_move(&mut self, touches: &[ClientPoint], frame: Rect) -> Option<RegionRequest> {
        let update = self.gesture.touch_move(touches, frame);
        self.after_gesture(update)
    }

    pub fn touch_end(&mut self, remaining: usize) -> Option<RegionRequest> {
        let update = self.gesture.touch_end(remaining);
        self.after_gesture(update)
    }

    /// `delta_y` must already be in pixels.
    pub fn wheel(
        &mut self,
        delta_y: f64,
        ctrl: bool,
        pointer: ClientPoint,
        frame: Rect,
    ) -> Option<RegionRequest> {
        let update = self.gesture.wheel(delta_y, ctrl, pointer, frame);
        self.after_gesture(update)
    }

    /// Tap on a marker pin. Zooms in on it when unzoomed; when already zoomed
    /// the anchor moves to the marker and the scale stays.
    pub fn tap_marker(&mut self, id: MarkerId) -> Option<RegionRequest> {
        let marker = self.markers.get(id)?;
        let (position, region) = (marker.position, marker.region_name.clone());

        if self.zoom.active().is_some() {
            self.gesture.retarget(position);
        } else {
            self.gesture.focus(position);
        }
        let change = self.zoom.focus_marker(id, &self.markers);
        // Re-tapping the active marker reopens a sheet the user collapsed and
        // fetches its photos again, so a failed load can be retried.
        let request = match self.apply(change) {
            Some(request) => Some(request),
            None => self.panel.select(Some(region.clone())),
        };
        self.sheet.force_expand(Some(region));
        request
    }

    /// Tap on the map outside any marker.
    ///
    /// Undoes a marker focus. A pinch or wheel zoom is left alone; only an
    /// explicit zoom-out ends it.
    pub fn tap_map(&mut self) -> Option<OriginReset> {
        match self.zoom.entry() {
            Some(ZoomEntry::Focused) => Some(self.zoom_out()),
            _ => None,
        }
    }

    /// Back to scale 1 with no selection. Redeem the token with
    /// [`MapSession::clear_origin`] after the configured delay.
    pub fn zoom_out(&mut self) -> OriginReset {
        let token = self.gesture.zoom_out();
        if self.zoom.zoom_out().is_some() {
            self.sheet.clear_region();
            self.panel.clear();
        }
        token
    }

    pub fn clear_origin(&mut self, token: OriginReset) -> bool {
        self.gesture.clear_origin(token)
    }

    pub fn resolve(&mut self, ticket: u64, result: Result<Vec<MapPhoto>, ApiError>) -> bool {
        self.panel.resolve(ticket, result)
    }
}
