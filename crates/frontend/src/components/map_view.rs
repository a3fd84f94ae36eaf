use dioxus::prelude::*;
use momentory_shared::geometry::{ClientPoint, MapPoint};
use momentory_shared::gesture::OriginReset;
use momentory_shared::markers::RegionOverlay;
use momentory_shared::models::MarkerId;
use momentory_shared::panel::RegionRequest;
use momentory_shared::session::MapSession;

use crate::coords;

const MAP_CONTAINER_ID: &str = "momentory-map-container";
const BASE_MAP: &str = "/static/map/gyeonggi.svg";
const DEFAULT_PIN: &str = "/static/markers/map-marker1.svg";

// ---------------------------------------------------------------------------
// Style builders (pure, testable)
// ---------------------------------------------------------------------------

/// Pin placement. The counter-scale keeps the pin's on-screen size fixed
/// while the layer underneath is zoomed.
fn marker_style(position: MapPoint, counter_scale: f64) -> String {
    format!(
        "top: {}%; left: {}%; transform: translate(-50%, -100%) scale({counter_scale}); transform-origin: 50% 100%;",
        position.top, position.left
    )
}

/// Tint a region shape by masking a solid color with its outline.
fn overlay_style(overlay: &RegionOverlay) -> String {
    let mask = format!("url('{}') center / contain no-repeat", overlay.path);
    format!(
        "background-color: {}; -webkit-mask: {mask}; mask: {mask};",
        overlay.color
    )
}

/// Wait out the zoom-out transition, then let the anchor return to center.
pub fn schedule_origin_reset(mut session: Signal<MapSession>, token: OriginReset) {
    let delay = session.read().config().origin_reset_delay_ms;
    spawn(async move {
        gloo_timers::future::TimeoutFuture::new(delay).await;
        if session.write().clear_origin(token) {
            tracing::debug!("zoom origin cleared");
        }
    });
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(session: Signal<MapSession>, on_request: EventHandler<RegionRequest>) -> Element {
    let mut session = session;

    let dispatch = move |req: Option<RegionRequest>| {
        if let Some(req) = req {
            on_request.call(req);
        }
    };

    let state = session.read();
    let transform_style = state.transform().css();
    let counter = state.counter_scale();
    let active = state.zoom().active();
    let overlays: Vec<(String, String)> = state
        .markers()
        .overlays()
        .iter()
        .map(|o| (o.region_name.clone(), overlay_style(o)))
        .collect();
    let pins: Vec<(MarkerId, String, String, String)> = state
        .markers()
        .iter()
        .map(|m| {
            (
                m.id,
                m.region_name.clone(),
                m.icon.clone().unwrap_or_else(|| DEFAULT_PIN.to_string()),
                marker_style(m.position, counter),
            )
        })
        .collect();
    let popup = state.active_marker().and_then(|m| {
        let photo = m.photo.as_ref()?;
        Some((
            photo.image_url.clone(),
            m.region_name.clone(),
            marker_style(m.position, counter),
        ))
    });
    let layer_class = if state.gesture().is_pinching() {
        "map-layer pinching"
    } else {
        "map-layer"
    };
    drop(state);

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "map-container",

            onwheel: move |evt: Event<WheelData>| {
                // Plain wheel scrolls the page
                if !evt.data().modifiers().ctrl() {
                    return;
                }
                evt.prevent_default();
                let Some(frame) = coords::element_rect(MAP_CONTAINER_ID) else { return };
                let delta_y = coords::wheel_delta_y(evt.data().delta());
                let c = evt.data().client_coordinates();
                let req = session.write().wheel(delta_y, true, ClientPoint::new(c.x, c.y), frame);
                dispatch(req);
            },

            ontouchstart: move |evt: Event<TouchData>| {
                let touches = coords::touch_points(&evt.data().touches());
                if touches.len() >= 2 {
                    evt.prevent_default();
                }
                let Some(frame) = coords::element_rect(MAP_CONTAINER_ID) else { return };
                let req = session.write().touch_start(&touches, frame);
                dispatch(req);
            },

            ontouchmove: move |evt: Event<TouchData>| {
                let touches = coords::touch_points(&evt.data().touches());
                if touches.len() < 2 {
                    return;
                }
                evt.prevent_default();
                let Some(frame) = coords::element_rect(MAP_CONTAINER_ID) else { return };
                let req = session.write().touch_move(&touches, frame);
                dispatch(req);
            },

            ontouchend: move |evt: Event<TouchData>| {
                let remaining = evt.data().touches().len();
                let req = session.write().touch_end(remaining);
                dispatch(req);
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                let req = session.write().touch_end(0);
                dispatch(req);
            },

            onclick: move |_| {
                let token = session.write().tap_map();
                if let Some(token) = token {
                    schedule_origin_reset(session, token);
                }
            },

            // Scaled layer: base map, region tints and pins move together
            div {
                class: "{layer_class}",
                style: "{transform_style}",

                img { class: "map-base", src: BASE_MAP, draggable: "false" }

                for (region, style) in overlays {
                    div { key: "{region}", class: "region-overlay", style: "{style}" }
                }

                for (id, region, icon, style) in pins {
                    button {
                        key: "{id}",
                        class: if active == Some(id) { "map-marker active" } else { "map-marker" },
                        style: "{style}",
                        title: "{region}",
                        onclick: move |evt: Event<MouseData>| {
                            evt.stop_propagation();
                            let req = session.write().tap_marker(id);
                            dispatch(req);
                        },
                        img { src: "{icon}", alt: "{region}", draggable: "false" }
                    }
                }

                if let Some((image_url, region, style)) = popup {
                    div { class: "marker-popup", style: "{style}",
                        img { src: "{image_url}", alt: "{region}" }
                    }
                }
            }
        }
    }
}
