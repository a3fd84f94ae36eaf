use dioxus::html::geometry::WheelDelta;
use dioxus::prelude::*;
use momentory_shared::geometry::{ClientPoint, Rect};

/// Bounding client rect of the element with `id`, if it is mounted.
pub fn element_rect(id: &str) -> Option<Rect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    let r = element.get_bounding_client_rect();
    Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
}

/// Convert a wheel delta (pixels / lines / pages) to pixels.
pub fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Client positions of the active touches, in event order.
pub fn touch_points(touches: &[TouchPoint]) -> Vec<ClientPoint> {
    touches
        .iter()
        .map(|t| {
            let c = t.client_coordinates();
            ClientPoint::new(c.x, c.y)
        })
        .collect()
}
