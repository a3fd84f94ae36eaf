//! Draggable bottom sheet with two resting heights.
//!
//! Mouse and touch listeners both feed `start`/`move_to`/`end` with a client Y
//! coordinate; nothing here knows which device produced it.

use tracing::debug;

use crate::config::MapConfig;
use crate::geometry::{ClientPoint, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetState {
    Collapsed,
    Expanded,
}

impl SheetState {
    fn toggled(self) -> Self {
        match self {
            SheetState::Collapsed => SheetState::Expanded,
            SheetState::Expanded => SheetState::Collapsed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    start_y: f64,
    start_height: f64,
    before: SheetState,
    left_slop: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BottomSheetController {
    state: SheetState,
    height: f64,
    region: Option<String>,
    drag: Option<DragSession>,
    min_height: f64,
    max_height: f64,
    commit_threshold: f64,
    tap_slop: f64,
    expanded_slack: f64,
}

impl Default for BottomSheetController {
    fn default() -> Self {
        BottomSheetController::new(&MapConfig::default())
    }
}

impl BottomSheetController {
    pub fn new(config: &MapConfig) -> Self {
        BottomSheetController {
            state: SheetState::Collapsed,
            height: config.sheet_min_height,
            region: None,
            drag: None,
            min_height: config.sheet_min_height,
            max_height: config.sheet_max_height,
            commit_threshold: config.sheet_commit_threshold,
            tap_slop: config.sheet_tap_slop,
            expanded_slack: config.sheet_expanded_slack,
        }
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Live height in pixels, including mid-drag.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whether the sheet is at or near full height. Follows the finger while
    /// dragging, so overlays can fade in before the drag commits.
    pub fn is_expanded(&self) -> bool {
        self.height >= self.max_height - self.expanded_slack
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn settle(&mut self, state: SheetState) {
        self.state = state;
        self.height = match state {
            SheetState::Collapsed => self.min_height,
            SheetState::Expanded => self.max_height,
        };
    }

    pub fn start(&mut self, y: f64) {
        self.drag = Some(DragSession {
            start_y: y,
            start_height: self.height,
            before: self.state,
            left_slop: false,
        });
    }

    /// Height is derived from the absolute pointer position against the drag
    /// start, never accumulated per frame.
    pub fn move_to(&mut self, y: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let delta = drag.start_y - y;
        if delta.abs() > self.tap_slop {
            drag.left_slop = true;
        }
        self.height = (drag.start_height + delta).clamp(self.min_height, self.max_height);
    }

    pub fn end(&mut self, y: f64) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let delta = drag.start_y - y;

        if !drag.left_slop && delta.abs() <= self.tap_slop {
            self.settle(drag.before.toggled());
            debug!(state = ?self.state, "sheet tapped");
            return;
        }

        let next = if delta > self.commit_threshold {
            SheetState::Expanded
        } else if delta < -self.commit_threshold {
            SheetState::Collapsed
        } else {
            drag.before
        };
        self.settle(next);
        debug!(delta, state = ?next, "sheet drag ended");
    }

    /// Abandon an in-flight drag and return to where it started.
    pub fn cancel(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.settle(drag.before);
        }
    }

    pub fn tap(&mut self) {
        self.drag = None;
        self.settle(self.state.toggled());
    }

    /// A region was selected on the map.
    pub fn force_expand(&mut self, region: Option<String>) {
        self.drag = None;
        if region.is_some() {
            self.region = region;
        }
        self.settle(SheetState::Expanded);
    }

    /// The selection went away. The sheet stays where it is.
    pub fn clear_region(&mut self) {
        self.region = None;
    }

    /// Collapse on a tap outside both the sheet and every excluded area
    /// (bottom navigation). Returns whether it collapsed.
    pub fn outside_tap(&mut self, point: ClientPoint, sheet: Rect, excluded: &[Rect]) -> bool {
        if self.state != SheetState::Expanded || self.drag.is_some() {
            return false;
        }
        if sheet.contains(point) || excluded.iter().any(|r| r.contains(point)) {
            return false;
        }
        self.settle(SheetState::Collapsed);
        true
    }
}
