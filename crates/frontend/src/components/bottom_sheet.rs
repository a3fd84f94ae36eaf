use dioxus::prelude::*;
use momentory_shared::session::MapSession;

pub const SHEET_ID: &str = "momentory-bottom-sheet";

/// Sheet heading for a region, e.g. "경기도 고양시".
pub fn sheet_title(region: Option<&str>) -> String {
    match region {
        Some(r) => format!("경기도 {r}"),
        None => "경기도".to_string(),
    }
}

#[component]
pub fn BottomSheet(session: Signal<MapSession>, children: Element) -> Element {
    let mut session = session;

    let state = session.read();
    let sheet = state.sheet();
    let height = sheet.height();
    let dragging = sheet.is_dragging();
    let class = match (dragging, sheet.is_expanded()) {
        (true, _) => "bottom-sheet dragging",
        (false, true) => "bottom-sheet expanded",
        (false, false) => "bottom-sheet",
    };
    drop(state);

    rsx! {
        div {
            id: SHEET_ID,
            class: "{class}",
            style: "height: {height}px;",
            // Keep taps inside the sheet away from outside-tap dismissal
            onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

            button {
                class: "sheet-handle",
                aria_label: "시트 열기/닫기",

                onmousedown: move |evt: Event<MouseData>| {
                    evt.prevent_default();
                    session.write().sheet_mut().start(evt.client_coordinates().y);
                },
                onmouseup: move |evt: Event<MouseData>| {
                    session.write().sheet_mut().end(evt.client_coordinates().y);
                },
                onkeydown: move |evt: Event<KeyboardData>| {
                    let key = evt.key();
                    if key == Key::Enter || key == Key::Character(" ".to_string()) {
                        evt.prevent_default();
                        session.write().sheet_mut().tap();
                    }
                },

                ontouchstart: move |evt: Event<TouchData>| {
                    if let Some(t) = evt.data().touches().first() {
                        session.write().sheet_mut().start(t.client_coordinates().y);
                    }
                },
                ontouchmove: move |evt: Event<TouchData>| {
                    evt.prevent_default();
                    if let Some(t) = evt.data().touches().first() {
                        session.write().sheet_mut().move_to(t.client_coordinates().y);
                    }
                },
                ontouchend: move |evt: Event<TouchData>| {
                    // Suppress the emulated mouse events that would replay the tap
                    evt.prevent_default();
                    match evt.data().touches_changed().first() {
                        Some(t) => session.write().sheet_mut().end(t.client_coordinates().y),
                        None => session.write().sheet_mut().cancel(),
                    }
                },
                ontouchcancel: move |_evt: Event<TouchData>| {
                    session.write().sheet_mut().cancel();
                },

                span { class: "sheet-grip" }
            }

            div { class: "sheet-body", {children} }

            // Mouse drags keep tracking outside the handle
            if dragging {
                div {
                    class: "sheet-drag-capture",
                    onmousemove: move |evt: Event<MouseData>| {
                        session.write().sheet_mut().move_to(evt.client_coordinates().y);
                    },
                    onmouseup: move |evt: Event<MouseData>| {
                        session.write().sheet_mut().end(evt.client_coordinates().y);
                    },
                    onmouseleave: move |_| {
                        session.write().sheet_mut().cancel();
                    },
                }
            }
        }
    }
}
