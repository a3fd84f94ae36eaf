//! Map-layer geometry.
//!
//! Marker placement and gesture anchors live in *percent space*: `(top, left)`
//! pairs in `[0, 100]` relative to the map layer's bounding box. Raw input
//! arrives in client (viewport) pixels and is converted here.

use serde::{de, Deserialize, Deserializer, Serialize};

/// A normalized point on the map layer, in percent of its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    #[serde(deserialize_with = "de_percent")]
    pub top: f64,
    #[serde(deserialize_with = "de_percent")]
    pub left: f64,
}

impl MapPoint {
    pub const CENTER: MapPoint = MapPoint {
        top: 50.0,
        left: 50.0,
    };

    /// Build a point, clamping both axes into `[0, 100]`.
    pub fn new(top: f64, left: f64) -> Self {
        MapPoint {
            top: clamp_percent(top),
            left: clamp_percent(left),
        }
    }

    /// Squared Euclidean distance in percent space.
    pub fn distance_sq(&self, other: &MapPoint) -> f64 {
        let dt = self.top - other.top;
        let dl = self.left - other.left;
        dt * dt + dl * dl
    }

    /// Whether `other` differs from `self` by more than `epsilon` on either axis.
    pub fn moved_from(&self, other: &MapPoint, epsilon: f64) -> bool {
        (self.top - other.top).abs() > epsilon || (self.left - other.left).abs() > epsilon
    }

    /// CSS position pair. CSS orders the horizontal component first.
    pub fn css(&self) -> String {
        format!("{}% {}%", self.left, self.top)
    }
}

/// A point in client (viewport) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

impl ClientPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ClientPoint { x, y }
    }

    pub fn distance(&self, other: &ClientPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(a: ClientPoint, b: ClientPoint) -> ClientPoint {
        ClientPoint {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }
}

/// An element's bounding client rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, p: ClientPoint) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    /// Convert a client point into this rect's percent space.
    ///
    /// Returns `None` for a degenerate (zero or negative sized) rect. Points
    /// outside the rect clamp to its edges.
    pub fn to_map_point(&self, p: ClientPoint) -> Option<MapPoint> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let left = (p.x - self.left) / self.width * 100.0;
        let top = (p.y - self.top) / self.height * 100.0;
        Some(MapPoint::new(top, left))
    }
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        return 50.0;
    }
    v.clamp(0.0, 100.0)
}

/// Parse a percentage written as `"40%"`, `"40"` or `" 40.5 % "`.
pub fn parse_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn de_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => parse_percent(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid percentage: {s}")))?,
    };
    Ok(clamp_percent(value))
}
