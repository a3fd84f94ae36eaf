use dioxus::prelude::*;
use momentory_shared::config::MapConfig;
use momentory_shared::geometry::{ClientPoint, Rect};
use momentory_shared::models::PhotoScope;
use momentory_shared::panel::RegionRequest;
use momentory_shared::session::MapSession;

use crate::api;
use crate::components::bottom_sheet::{sheet_title, BottomSheet, SHEET_ID};
use crate::components::map_view::{schedule_origin_reset, MapView};
use crate::components::region_panel::{visit_label, RegionPanel};
use crate::coords;

const NAV_ID: &str = "momentory-bottom-nav";

/// Run a region photo request and hand the answer back with its ticket.
fn run_request(mut session: Signal<MapSession>, req: RegionRequest) {
    spawn(async move {
        let result = api::fetch_region_photos(&req.region, req.scope).await;
        if !session.write().resolve(req.ticket, result) {
            tracing::debug!(region = %req.region, "region response superseded");
        }
    });
}

fn open_photo_list(session: Signal<MapSession>, index: Option<usize>) {
    let Some(handoff) = session.read().panel().see_all(index) else {
        return;
    };
    let url = match api::photo_list_url(&handoff) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "could not build photo list link");
            return;
        }
    };
    if let Some(window) = web_sys::window() {
        if window.location().set_href(&url).is_err() {
            tracing::warn!(url = %url, "navigation to photo list failed");
        }
    }
}

/// Map-level banner while the visited-region markers load, or after they fail.
fn marker_banner(scope: PhotoScope, failed: bool) -> &'static str {
    match (scope, failed) {
        (PhotoScope::Mine, false) => "방문한 지역 정보를 불러오는 중입니다...",
        (PhotoScope::Mine, true) => "방문한 지역 정보를 불러오지 못했어요.",
        (PhotoScope::Public, false) => "공개 사진 정보를 불러오는 중입니다...",
        (PhotoScope::Public, true) => "공개 사진 정보를 불러오지 못했어요.",
    }
}

fn scope_title(scope: PhotoScope) -> &'static str {
    match scope {
        PhotoScope::Mine => "내 지도",
        PhotoScope::Public => "전체 지도",
    }
}

#[component]
pub fn MapPage(scope: PhotoScope) -> Element {
    let mut session = use_signal(move || MapSession::new(scope, MapConfig::default()));

    let markers_resource = use_resource(move || api::fetch_external_markers(scope));

    // Re-merge whenever a fresh marker list arrives
    use_effect(move || match &*markers_resource.read() {
        Some(Ok(external)) => {
            let req = session.write().set_external_markers(external);
            if let Some(req) = req {
                run_request(session, req);
            }
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, scope = %scope, "map markers unavailable, showing defaults");
        }
        None => {}
    });

    let state = session.read();
    let zoomed = state.zoom().active().is_some();
    let title = sheet_title(state.sheet().region());
    let visited = state.panel().latest_visit().map(visit_label);
    drop(state);

    let banner = match &*markers_resource.read() {
        None => Some(marker_banner(scope, false)),
        Some(Err(_)) => Some(marker_banner(scope, true)),
        Some(Ok(_)) => None,
    };
    let heading = scope_title(scope);
    let link_class = |s: PhotoScope| if s == scope { "active" } else { "" }.to_string();
    let public_class = link_class(PhotoScope::Public);
    let mine_class = link_class(PhotoScope::Mine);

    rsx! {
        div {
            class: "map-page",
            onclick: move |evt: Event<MouseData>| {
                let Some(sheet) = coords::element_rect(SHEET_ID) else { return };
                let excluded: Vec<Rect> = coords::element_rect(NAV_ID).into_iter().collect();
                let c = evt.client_coordinates();
                session
                    .write()
                    .sheet_mut()
                    .outside_tap(ClientPoint::new(c.x, c.y), sheet, &excluded);
            },

            header { class: "map-header",
                h1 { "{heading}" }
                nav { class: "scope-switch",
                    Link {
                        class: public_class,
                        to: crate::Route::PublicMap {},
                        "전체 지도"
                    }
                    Link {
                        class: mine_class,
                        to: crate::Route::MyMap {},
                        "내 지도"
                    }
                }
                if zoomed {
                    button {
                        class: "zoom-out",
                        onclick: move |evt: Event<MouseData>| {
                            evt.stop_propagation();
                            let token = session.write().zoom_out();
                            schedule_origin_reset(session, token);
                        },
                        "전체 보기"
                    }
                }
            }

            if let Some(banner) = banner {
                p { class: "map-status", role: "status", "{banner}" }
            }

            MapView {
                session: session,
                on_request: move |req| run_request(session, req),
            }

            BottomSheet { session: session,
                h2 { class: "sheet-title", "{title}" }
                if let Some(visited) = visited {
                    p { class: "sheet-subtitle", "{visited}" }
                }
                RegionPanel {
                    session: session,
                    on_see_all: move |index| open_photo_list(session, index),
                }
            }

            nav { id: NAV_ID, class: "bottom-nav",
                a { href: "/", "홈" }
                a { href: "/album", "앨범" }
                a { class: "active", href: "/myMap", "지도" }
                a { href: "/mypage", "마이" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_banner_per_scope() {
        assert_eq!(
            marker_banner(PhotoScope::Mine, false),
            "방문한 지역 정보를 불러오는 중입니다..."
        );
        assert_eq!(
            marker_banner(PhotoScope::Mine, true),
            "방문한 지역 정보를 불러오지 못했어요."
        );
        assert_eq!(
            marker_banner(PhotoScope::Public, true),
            "공개 사진 정보를 불러오지 못했어요."
        );
    }

    #[test]
    fn test_scope_title() {
        assert_eq!(scope_title(PhotoScope::Mine), "내 지도");
        assert_eq!(scope_title(PhotoScope::Public), "전체 지도");
    }
}
