use crate::geometry::MapPoint;

/// CSS transform applied to the map layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// `None` renders as the geometric center.
    pub transform_origin: Option<MapPoint>,
    pub scale_factor: f64,
}

impl ViewportTransform {
    /// `base_scale` is the cosmetic shrink that leaves a margin around the
    /// unzoomed map.
    pub fn compute(scale: f64, origin: Option<MapPoint>, base_scale: f64) -> Self {
        ViewportTransform {
            transform_origin: origin,
            scale_factor: base_scale * scale,
        }
    }

    pub fn origin_css(&self) -> String {
        match self.transform_origin {
            Some(p) => p.css(),
            None => "center center".to_string(),
        }
    }

    /// Inline style for the map layer.
    pub fn css(&self) -> String {
        format!(
            "transform: scale({}); transform-origin: {};",
            self.scale_factor,
            self.origin_css()
        )
    }
}

/// Inverse of the user zoom, so pins and popups keep their on-screen size.
/// Never enlarges: anything below 1 is treated as unzoomed.
pub fn counter_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 1.0 {
        1.0 / scale
    } else {
        1.0
    }
}
