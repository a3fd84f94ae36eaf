//! Gyeonggi province region catalog.
//!
//! The illustrated map covers roughly 36.9–38.0°N by 126.5–127.7°E. Catalog
//! regions are placed on it by linear interpolation inside that box; this is a
//! placement aid for a flat illustration, not a projection.

use crate::geometry::MapPoint;
use crate::models::{GeoPoint, Marker, MarkerId};

// Geographic bounds of the illustration
pub const MIN_LAT: f64 = 36.9;
pub const MAX_LAT: f64 = 38.0;
pub const MIN_LNG: f64 = 126.5;
pub const MAX_LNG: f64 = 127.7;

/// Pin images cycled across the default markers.
pub const MARKER_ICONS: [&str; 3] = [
    "/static/markers/map-marker1.svg",
    "/static/markers/map-marker2.svg",
    "/static/markers/map-marker3.svg",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionInfo {
    pub name: &'static str,
    /// File stem of the region's overlay mask under `/static/regions/`.
    pub overlay: &'static str,
    /// Representative coordinate (city hall).
    pub center: GeoPoint,
}

const fn region(name: &'static str, overlay: &'static str, lat: f64, lng: f64) -> RegionInfo {
    RegionInfo {
        name,
        overlay,
        center: GeoPoint { lat, lng },
    }
}

pub const REGIONS: &[RegionInfo] = &[
    region("수원시", "수원", 37.2636, 127.0286),
    region("성남시", "성남", 37.4200, 127.1267),
    region("고양시", "고양시", 37.6584, 126.8320),
    region("용인시", "용인", 37.2411, 127.1776),
    region("부천시", "부천", 37.5034, 126.7660),
    region("안산시", "안산", 37.3219, 126.8309),
    region("안양시", "안양", 37.3943, 126.9568),
    region("남양주시", "남양주", 37.6360, 127.2165),
    region("화성시", "화성", 37.1995, 126.8312),
    region("평택시", "평택", 36.9921, 127.1129),
    region("의정부시", "의정부", 37.7381, 127.0337),
    region("시흥시", "시흥", 37.3800, 126.8029),
    region("파주시", "파주시", 37.7599, 126.7800),
    region("김포시", "김포시", 37.6153, 126.7156),
    region("광명시", "광명", 37.4786, 126.8646),
    region("광주시", "광주", 37.4294, 127.2551),
    region("군포시", "군포", 37.3617, 126.9352),
    region("하남시", "하남", 37.5393, 127.2148),
    region("오산시", "오산", 37.1499, 127.0774),
    region("이천시", "이천", 37.2720, 127.4350),
    region("안성시", "안성", 37.0080, 127.2797),
    region("의왕시", "의왕", 37.3448, 126.9683),
    region("양주시", "양주", 37.7853, 127.0458),
    region("구리시", "구리", 37.5943, 127.1296),
    region("포천시", "포천", 37.8949, 127.2003),
    region("여주시", "여주", 37.2983, 127.6370),
    region("동두천시", "동두천", 37.9036, 127.0606),
    region("과천시", "과천", 37.4292, 126.9876),
    region("양평군", "양평", 37.4917, 127.4875),
    region("가평군", "가평", 37.8315, 127.5105),
    region("연천군", "연천", 38.0964, 127.0749),
];

pub fn find_region(name: &str) -> Option<&'static RegionInfo> {
    REGIONS.iter().find(|r| r.name == name)
}

/// Place a coordinate on the illustration. North is up, so latitude maps
/// inversely onto `top`. Results clamp to the map edges.
pub fn geo_to_map_position(geo: GeoPoint) -> MapPoint {
    let lat_ratio = (geo.lat - MIN_LAT) / (MAX_LAT - MIN_LAT);
    let lng_ratio = (geo.lng - MIN_LNG) / (MAX_LNG - MIN_LNG);
    MapPoint::new((1.0 - lat_ratio) * 100.0, lng_ratio * 100.0)
}

pub fn region_position(name: &str) -> Option<MapPoint> {
    find_region(name).map(|r| geo_to_map_position(r.center))
}

/// URL of the mask image used to tint a region's shape.
pub fn region_overlay_path(name: &str) -> Option<String> {
    find_region(name).map(|r| format!("/static/regions/{}.svg", r.overlay))
}

/// One marker per catalog region, ids `1..=REGIONS.len()` in catalog order.
pub fn default_markers() -> Vec<Marker> {
    REGIONS
        .iter()
        .enumerate()
        .map(|(i, r)| Marker {
            id: MarkerId(i as u32 + 1),
            position: geo_to_map_position(r.center),
            geo: Some(r.center),
            region_name: r.name.to_string(),
            color: None,
            photo: None,
            icon: Some(MARKER_ICONS[i % MARKER_ICONS.len()].to_string()),
        })
        .collect()
}
