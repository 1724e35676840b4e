//! Immutable HUD view model

use contracts::{HotspotId, IconKind, OrientationSample};
use serde::Serialize;

use crate::capture::CameraStatus;
use crate::projector::ProjectedHotspot;
use crate::sampler::SamplerState;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub timestamp_ms: i64,
    pub scanning: bool,
    /// 0.0 at mount, 1.0 once scanning is over
    pub scan_progress: f64,
    pub sensor: SamplerState,
    pub orientation: Option<OrientationSample>,
    pub stability: u32,
    pub low_stability: bool,
    pub camera: CameraStatus,
    pub hotspots: Vec<HotspotView>,
    pub locked: Option<HotspotId>,
    pub active: Option<HotspotId>,
    pub navigation: Option<HotspotId>,
    pub map: MapView,
    pub briefing: Option<String>,
    pub flash: bool,
}

impl HudSnapshot {
    pub fn hotspot(&self, id: &str) -> Option<&HotspotView> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    /// Detail overlay is open
    pub fn detail_open(&self) -> bool {
        self.active.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotView {
    pub id: HotspotId,
    pub label: String,
    pub icon: IconKind,
    pub projection: ProjectedHotspot,
    pub locked: bool,
    pub active: bool,
    /// Faded because another hotspot's detail overlay is open
    pub dimmed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapView {
    pub open: bool,
    pub selected: Option<HotspotId>,
}
