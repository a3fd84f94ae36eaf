//! The merged marker set and nearest-marker lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use crate::geometry::MapPoint;
use crate::models::{ExternalMarker, Marker, MarkerId, RegionColorMap};
use crate::regions;

/// Tinted overlay for one region shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionOverlay {
    pub region_name: String,
    pub path: String,
    pub color: String,
}

/// Immutable snapshot of the merged markers. Cloning shares the snapshot, so
/// hit-testing and rendering always see the same set.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerIndex {
    markers: Arc<[Marker]>,
}

impl Default for MarkerIndex {
    fn default() -> Self {
        MarkerIndex::new(Vec::new())
    }
}

impl MarkerIndex {
    pub fn new(markers: Vec<Marker>) -> Self {
        MarkerIndex {
            markers: markers.into(),
        }
    }

    /// Merge externally contributed markers over the defaults by region name.
    ///
    /// Present external fields overwrite the default's; the default's id is
    /// kept. Later external entries win over earlier ones for the same region.
    pub fn merge(defaults: &[Marker], external: &[ExternalMarker]) -> Self {
        let mut merged = defaults.to_vec();

        for ext in external {
            let Some(name) = ext
                .region_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
            else {
                warn!(color = ?ext.color, "dropping external marker without a region name");
                continue;
            };

            if let Some(existing) = merged.iter_mut().find(|m| m.region_name == name) {
                overlay_fields(existing, ext);
                continue;
            }

            let Some(position) = derive_position(name, ext) else {
                warn!(region = name, "dropping external marker with no known position");
                continue;
            };
            merged.push(Marker {
                id: derived_id(name),
                position,
                geo: ext.geo,
                region_name: name.to_string(),
                color: ext.color.clone(),
                photo: ext.photo.clone(),
                icon: ext.icon.clone(),
            });
        }

        MarkerIndex::new(merged)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn by_region(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.region_name == name)
    }

    /// Marker closest to `point` in percent space. Ties go to the earlier
    /// marker.
    pub fn nearest(&self, point: MapPoint) -> Option<MarkerId> {
        let mut best: Option<(MarkerId, f64)> = None;
        for m in self.markers.iter() {
            let d = m.position.distance_sq(&point);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((m.id, d)),
            }
        }
        best.map(|(id, _)| id)
    }

    pub fn color_map(&self) -> RegionColorMap {
        self.markers
            .iter()
            .filter_map(|m| Some((m.region_name.clone(), m.color.clone()?)))
            .collect::<BTreeMap<_, _>>()
    }

    /// Colored regions that have an overlay shape in the catalog.
    pub fn overlays(&self) -> Vec<RegionOverlay> {
        self.markers
            .iter()
            .filter_map(|m| {
                let color = m.color.clone()?;
                let path = regions::region_overlay_path(&m.region_name)?;
                Some(RegionOverlay {
                    region_name: m.region_name.clone(),
                    path,
                    color,
                })
            })
            .collect()
    }
}

fn overlay_fields(target: &mut Marker, ext: &ExternalMarker) {
    if let Some(position) = ext.position {
        target.position = position;
    }
    if let Some(geo) = ext.geo {
        target.geo = Some(geo);
    }
    if let Some(color) = &ext.color {
        target.color = Some(color.clone());
    }
    if let Some(photo) = &ext.photo {
        target.photo = Some(photo.clone());
    }
    if let Some(icon) = &ext.icon {
        target.icon = Some(icon.clone());
    }
}

fn derive_position(name: &str, ext: &ExternalMarker) -> Option<MapPoint> {
    ext.position
        .or_else(|| regions::region_position(name))
        .or_else(|| ext.geo.map(regions::geo_to_map_position))
}

/// FNV-1a over the region name, high bit set so it never collides with the
/// small sequential ids of the default set.
fn derived_id(region: &str) -> MarkerId {
    let mut hash: u32 = 0x811c_9dc5;
    for b in region.as_bytes() {
        hash ^= u32::from(*b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    MarkerId(hash | 0x8000_0000)
}
