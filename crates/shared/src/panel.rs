//! Photo content for the selected region.
//!
//! The panel never performs I/O itself. `select` hands back a [`RegionRequest`]
//! for the caller to run; the answer comes back through `resolve` together with
//! the request's ticket, and only the newest ticket is accepted.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::MapConfig;
use crate::error::ApiError;
use crate::models::{MapPhoto, PhotoScope};

pub const LOAD_FAILED_MESSAGE: &str = "사진 정보를 불러오지 못했어요";
pub const EMPTY_MESSAGE: &str = "아직 이 지역에 기록된 사진이 없어요";
pub const IDLE_MESSAGE: &str = "마커를 클릭하여 지역 정보를 확인하세요";

/// Path of the full photo list screen.
pub const PHOTO_LIST_PATH: &str = "/map/photos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRequest {
    pub ticket: u64,
    pub region: String,
    pub scope: PhotoScope,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Idle,
    Loading,
    Empty,
    Ready(Vec<MapPhoto>),
    Failed,
}

/// The capped thumbnail grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnails<'a> {
    pub shown: &'a [MapPhoto],
    /// Photos not shown; rendered as "+N".
    pub overflow: usize,
}

/// Request to open the full list screen for a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoListHandoff {
    pub region: String,
    pub scope: PhotoScope,
    pub selected_index: Option<usize>,
}

impl PhotoListHandoff {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("scope", self.scope.as_str().to_string()),
            ("region", self.region.clone()),
        ];
        if let Some(i) = self.selected_index {
            pairs.push(("index", i.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionContentPanel {
    scope: PhotoScope,
    region: Option<String>,
    state: PanelState,
    latest_ticket: u64,
    capacity: usize,
}

impl RegionContentPanel {
    pub fn new(scope: PhotoScope, config: &MapConfig) -> Self {
        RegionContentPanel {
            scope,
            region: None,
            state: PanelState::Idle,
            latest_ticket: 0,
            capacity: config.thumbnail_capacity,
        }
    }

    pub fn scope(&self) -> PhotoScope {
        self.scope
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    fn issue(&mut self) -> Option<RegionRequest> {
        // Any outstanding response is stale from here on.
        self.latest_ticket += 1;
        let region = self.region.clone()?;
        self.state = PanelState::Loading;
        debug!(ticket = self.latest_ticket, region = %region, scope = %self.scope, "requesting region photos");
        Some(RegionRequest {
            ticket: self.latest_ticket,
            region,
            scope: self.scope,
        })
    }

    /// Change the selected region. Always issues a fresh request, even for the
    /// region already shown, so a failed load can be retried by reselecting.
    pub fn select(&mut self, region: Option<String>) -> Option<RegionRequest> {
        let Some(region) = region else {
            self.clear();
            return None;
        };
        self.region = Some(region);
        self.issue()
    }

    /// Drop the selection. Outstanding responses become stale.
    pub fn clear(&mut self) {
        self.latest_ticket += 1;
        self.region = None;
        self.state = PanelState::Idle;
    }

    /// Apply a finished request. Returns `false` when the response was stale
    /// and got discarded.
    pub fn resolve(&mut self, ticket: u64, result: Result<Vec<MapPhoto>, ApiError>) -> bool {
        if ticket != self.latest_ticket || self.region.is_none() {
            debug!(ticket, latest = self.latest_ticket, "discarding stale region response");
            return false;
        }
        self.state = match result {
            Ok(photos) if photos.is_empty() => PanelState::Empty,
            Ok(photos) => PanelState::Ready(photos),
            Err(e) => {
                warn!(error = %e, region = ?self.region, "region photo request failed");
                PanelState::Failed
            }
        };
        true
    }

    pub fn photos(&self) -> &[MapPhoto] {
        match &self.state {
            PanelState::Ready(photos) => photos,
            _ => &[],
        }
    }

    pub fn thumbnails(&self) -> Thumbnails<'_> {
        let photos = self.photos();
        let shown = &photos[..photos.len().min(self.capacity)];
        Thumbnails {
            shown,
            overflow: photos.len() - shown.len(),
        }
    }

    /// Most recent visit among the loaded photos.
    pub fn latest_visit(&self) -> Option<NaiveDate> {
        self.photos().iter().filter_map(MapPhoto::visit_date).max()
    }

    /// Message to show instead of thumbnails, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self.state {
            PanelState::Idle => Some(IDLE_MESSAGE),
            PanelState::Empty => Some(EMPTY_MESSAGE),
            PanelState::Failed => Some(LOAD_FAILED_MESSAGE),
            PanelState::Loading | PanelState::Ready(_) => None,
        }
    }

    pub fn see_all(&self, selected_index: Option<usize>) -> Option<PhotoListHandoff> {
        let region = self.region.clone()?;
        Some(PhotoListHandoff {
            region,
            scope: self.scope,
            selected_index: selected_index.filter(|i| *i < self.photos().len()),
        })
    }
}
