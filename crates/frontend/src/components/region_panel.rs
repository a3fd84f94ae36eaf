use chrono::NaiveDate;
use dioxus::prelude::*;
use momentory_shared::models::PhotoScope;
use momentory_shared::panel::PanelState;
use momentory_shared::session::MapSession;

const SKELETON_TILES: usize = 6;

fn section_title(scope: PhotoScope) -> &'static str {
    match scope {
        PhotoScope::Mine => "나의 사진",
        PhotoScope::Public => "모두의 사진",
    }
}

/// "최근 방문 2025-10-15"
pub fn visit_label(date: NaiveDate) -> String {
    format!("최근 방문 {}", date.format("%Y-%m-%d"))
}

/// "+N" tile text, or nothing when every photo fits.
fn overflow_label(overflow: usize) -> Option<String> {
    (overflow > 0).then(|| format!("+{overflow}"))
}

#[component]
pub fn RegionPanel(session: Signal<MapSession>, on_see_all: EventHandler<Option<usize>>) -> Element {
    let state = session.read();
    let panel = state.panel();
    let title = section_title(panel.scope());
    let loading = matches!(panel.state(), PanelState::Loading);
    let message = panel.message();
    let thumbs = panel.thumbnails();
    let tiles: Vec<(usize, String, String)> = thumbs
        .shown
        .iter()
        .enumerate()
        .map(|(i, p)| {
            (
                i,
                p.image_url.clone(),
                p.memo.clone().or_else(|| p.address.clone()).unwrap_or_default(),
            )
        })
        .collect();
    let overflow = overflow_label(thumbs.overflow);
    drop(state);

    rsx! {
        div { class: "region-panel",
            h3 { "{title}" }

            if loading {
                div { class: "thumb-grid",
                    for i in 0..SKELETON_TILES {
                        div { key: "{i}", class: "thumb skeleton" }
                    }
                }
            } else if let Some(message) = message {
                p { class: "panel-message", "{message}" }
            } else {
                div { class: "thumb-grid",
                    for (i, url, alt) in tiles {
                        button {
                            key: "{i}",
                            class: "thumb",
                            onclick: move |_| on_see_all.call(Some(i)),
                            img { src: "{url}", alt: "{alt}", loading: "lazy" }
                        }
                    }
                    if let Some(label) = overflow {
                        button {
                            class: "thumb more",
                            onclick: move |_| on_see_all.call(None),
                            "{label}"
                        }
                    }
                }
            }
        }
    }
}
