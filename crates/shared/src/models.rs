use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::geometry::MapPoint;

/// Stable marker identity. UI keys and transitions depend on it, so it is
/// never reassigned from external data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u32);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Which photo collection a region query reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoScope {
    Mine,
    Public,
}

impl PhotoScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoScope::Mine => "mine",
            PhotoScope::Public => "public",
        }
    }
}

impl std::fmt::Display for PhotoScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPhoto {
    pub photo_id: u64,
    #[serde(default)]
    pub image_name: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

impl MapPhoto {
    /// Calendar date of `created_at`. Accepts RFC 3339, naive ISO date-times
    /// (with or without fractional seconds) and plain dates.
    pub fn visit_date(&self) -> Option<NaiveDate> {
        let raw = self.created_at.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// A marker in the merged set.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: MapPoint,
    pub geo: Option<GeoPoint>,
    pub region_name: String,
    pub color: Option<String>,
    pub photo: Option<MapPhoto>,
    pub icon: Option<String>,
}

/// A marker contributed by the external marker store. Absent fields fall back
/// to the matching default marker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalMarker {
    pub region_name: Option<String>,
    pub position: Option<MapPoint>,
    pub geo: Option<GeoPoint>,
    pub color: Option<String>,
    pub photo: Option<MapPhoto>,
    pub icon: Option<String>,
}

/// Region name → overlay tint.
pub type RegionColorMap = BTreeMap<String, String>;
/// Region name → latest photo. Regions without a photo come back as `null`.
pub type RegionPhotoMap = BTreeMap<String, Option<MapPhoto>>;

/// Envelope every map endpoint responds with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapApiResponse<T> {
    pub is_success: bool,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    pub result: Option<T>,
}

impl<T> MapApiResponse<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.is_success {
            return Err(ApiError::Rejected {
                code: self.code,
                message: self.message,
            });
        }
        self.result.ok_or(ApiError::MissingResult)
    }
}

/// Build the external marker list from the latest-photo and color maps.
///
/// Regions whose latest photo is `null` have nothing to show and are skipped.
pub fn external_markers(photos: &RegionPhotoMap, colors: &RegionColorMap) -> Vec<ExternalMarker> {
    photos
        .iter()
        .filter_map(|(region, photo)| {
            let photo = photo.as_ref()?;
            Some(ExternalMarker {
                region_name: Some(region.clone()),
                position: None,
                geo: match (photo.latitude, photo.longitude) {
                    (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
                    _ => None,
                },
                color: colors.get(region).cloned(),
                photo: Some(photo.clone()),
                icon: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(created_at: &str) -> MapPhoto {
        MapPhoto {
            photo_id: 7,
            image_name: None,
            image_url: "https://cdn.example.com/7.jpg".to_string(),
            latitude: None,
            longitude: None,
            address: None,
            memo: None,
            visibility: None,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_map_photo_deserializes() {
        let json = r#"{"photoId":12,"imageName":"a.jpg","imageUrl":"https://x/a.jpg","latitude":37.26,"longitude":127.02,"address":"경기도 수원시","memo":"hi","visibility":"PUBLIC","createdAt":"2025-10-15T09:30:00"}"#;
        let p: MapPhoto = serde_json::from_str(json).unwrap();
        assert_eq!(p.photo_id, 12);
        assert_eq!(p.address.as_deref(), Some("경기도 수원시"));
        assert_eq!(p.visit_date(), NaiveDate::from_ymd_opt(2025, 10, 15));
    }

    #[test]
    fn test_map_photo_minimal_fields() {
        let json = r#"{"photoId":1,"imageUrl":"u"}"#;
        let p: MapPhoto = serde_json::from_str(json).unwrap();
        assert!(p.address.is_none());
        assert!(p.visit_date().is_none());
    }

    #[test]
    fn test_visit_date_formats() {
        assert_eq!(
            photo("2025-10-15T09:30:00.123456").visit_date(),
            NaiveDate::from_ymd_opt(2025, 10, 15)
        );
        assert_eq!(
            photo("2025-03-01T23:59:59+09:00").visit_date(),
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
        assert_eq!(photo("2024-12-31").visit_date(), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(photo("yesterday").visit_date(), None);
    }

    #[test]
    fn test_photo_scope_strings() {
        assert_eq!(PhotoScope::Public.to_string(), "public");
        assert_eq!(PhotoScope::Mine.as_str(), "mine");
        let scope: PhotoScope = serde_json::from_str(r#""public""#).unwrap();
        assert_eq!(scope, PhotoScope::Public);
    }

    #[test]
    fn test_envelope_success() {
        let json = r##"{"isSuccess":true,"code":"COMMON200","message":"ok","result":{"수원시":"#FF5733"}}"##;
        let resp: MapApiResponse<RegionColorMap> = serde_json::from_str(json).unwrap();
        let colors = resp.into_result().unwrap();
        assert_eq!(colors.get("수원시").map(String::as_str), Some("#FF5733"));
    }

    #[test]
    fn test_envelope_rejected() {
        let json = r#"{"isSuccess":false,"code":"AUTH401","message":"expired","result":null}"#;
        let resp: MapApiResponse<RegionColorMap> = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_result().unwrap_err(),
            ApiError::Rejected {
                code: "AUTH401".to_string(),
                message: "expired".to_string()
            }
        );
    }

    #[test]
    fn test_envelope_missing_result() {
        let json = r#"{"isSuccess":true,"code":"COMMON200","message":"ok"}"#;
        let resp: MapApiResponse<Vec<MapPhoto>> = serde_json::from_str(json).unwrap();
        assert_eq!(resp.into_result().unwrap_err(), ApiError::MissingResult);
    }

    #[test]
    fn test_external_markers_skip_null_photos() {
        let mut photos = RegionPhotoMap::new();
        photos.insert("수원시".to_string(), Some(photo("2025-10-15")));
        photos.insert("고양시".to_string(), None);
        let mut colors = RegionColorMap::new();
        colors.insert("수원시".to_string(), "#FF5733".to_string());

        let ext = external_markers(&photos, &colors);
        assert_eq!(ext.len(), 1);
        assert_eq!(ext[0].region_name.as_deref(), Some("수원시"));
        assert_eq!(ext[0].color.as_deref(), Some("#FF5733"));
        assert!(ext[0].photo.is_some());
    }

    #[test]
    fn test_external_marker_deserializes_with_defaults() {
        let m: ExternalMarker = serde_json::from_str(r##"{"regionName":"파주시","color":"#00FF00"}"##).unwrap();
        assert_eq!(m.region_name.as_deref(), Some("파주시"));
        assert!(m.position.is_none());
        assert!(m.photo.is_none());
    }
}
