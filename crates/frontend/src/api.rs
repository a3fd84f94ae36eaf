use momentory_shared::error::ApiError;
use momentory_shared::models::{
    external_markers, ExternalMarker, MapApiResponse, MapPhoto, PhotoScope, RegionColorMap,
    RegionPhotoMap,
};
use momentory_shared::panel::{PhotoListHandoff, PHOTO_LIST_PATH};
use serde::de::DeserializeOwned;

const TOKEN_KEY: &str = "accessToken";

/// Tint for every visited region on the public map.
pub const PUBLIC_REGION_COLOR: &str = "#FF7070";

fn api_url() -> String {
    if let Some(url) = option_env!("MOMENTORY_API_URL") {
        return url.trim_end_matches('/').to_string();
    }
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

fn access_token() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    storage.get_item(TOKEN_KEY).ok()?
}

/// Join base, path and query, percent-encoding the query values.
pub fn build_url(base: &str, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
    let mut url = reqwest::Url::parse(&format!("{base}{path}"))
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    Ok(url.to_string())
}

/// Unwrap the `{isSuccess, code, message, result}` envelope.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: MapApiResponse<T> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    envelope.into_result()
}

/// Region photo lists tolerate a missing or non-array result as "no photos".
pub fn decode_photo_list(body: &str) -> Result<Vec<MapPhoto>, ApiError> {
    let envelope: MapApiResponse<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    match envelope.into_result() {
        Ok(value @ serde_json::Value::Array(_)) => {
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
        }
        Ok(_) | Err(ApiError::MissingResult) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

async fn get_body(path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
    let url = build_url(&api_url(), path, query)?;
    let mut req = reqwest::Client::new().get(url);
    if let Some(token) = access_token() {
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    let resp = req
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), path, "map request failed");
        return Err(ApiError::Status(status.as_u16()));
    }
    resp.text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    decode(&get_body(path, &[]).await?)
}

pub async fn fetch_region_colors() -> Result<RegionColorMap, ApiError> {
    get("/api/map/my").await
}

pub async fn fetch_latest_photos(scope: PhotoScope) -> Result<RegionPhotoMap, ApiError> {
    match scope {
        PhotoScope::Mine => get("/api/map/my/photos").await,
        PhotoScope::Public => get("/api/map/public").await,
    }
}

pub async fn fetch_region_photos(
    region: &str,
    scope: PhotoScope,
) -> Result<Vec<MapPhoto>, ApiError> {
    let path = match scope {
        PhotoScope::Mine => "/api/map/my/photos/detail",
        PhotoScope::Public => "/api/map/public/photos",
    };
    decode_photo_list(&get_body(path, &[("regionName", region)]).await?)
}

/// The public map paints every region that has a photo in one color.
pub fn public_colors(photos: &RegionPhotoMap) -> RegionColorMap {
    photos
        .iter()
        .filter(|(_, p)| p.is_some())
        .map(|(region, _)| (region.clone(), PUBLIC_REGION_COLOR.to_string()))
        .collect()
}

/// Latest photos plus region colors, shaped as external markers.
pub async fn fetch_external_markers(scope: PhotoScope) -> Result<Vec<ExternalMarker>, ApiError> {
    let photos = fetch_latest_photos(scope).await?;
    let colors = match scope {
        PhotoScope::Mine => fetch_region_colors().await.unwrap_or_else(|e| {
            // Pins still work without tints.
            tracing::warn!(error = %e, "region colors unavailable");
            RegionColorMap::new()
        }),
        PhotoScope::Public => public_colors(&photos),
    };
    let markers = external_markers(&photos, &colors);
    tracing::info!(scope = %scope, markers = markers.len(), "loaded map markers");
    Ok(markers)
}

/// Same-origin link to the full photo list screen.
pub fn photo_list_url(handoff: &PhotoListHandoff) -> Result<String, ApiError> {
    let pairs = handoff.query_pairs();
    let query: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    build_url(&origin, PHOTO_LIST_PATH, &query)
}
