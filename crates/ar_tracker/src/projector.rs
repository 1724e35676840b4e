//! Hotspot projection
//!
//! Placement is the nominal scene position (percent of the viewport) plus a
//! pixel shift driven by device tilt:
//!
//! - `shift_x = gamma * K`
//! - `shift_y = (beta - neutral_tilt) * K`
//!
//! Without an orientation reading the shift is zero (static placement).
//! Scale shrinks with catalog position: `1 / (depth * depth_factor)` where
//! `depth = depth_base + index * depth_step`.

use contracts::{HotspotDefinition, HotspotId, NormalizedPoint, OrientationSample, ProjectionConfig};
use serde::Serialize;

/// Render hint for one hotspot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedHotspot {
    pub index: usize,
    pub id: HotspotId,
    /// Nominal position in viewport percent
    pub base: NormalizedPoint,
    pub shift_x_px: f64,
    pub shift_y_px: f64,
    pub scale: f64,
}

impl ProjectedHotspot {
    /// Absolute pixel position inside a `width` x `height` viewport
    pub fn resolve(&self, width: f64, height: f64) -> (f64, f64) {
        (
            self.base.x / 100.0 * width + self.shift_x_px,
            self.base.y / 100.0 * height + self.shift_y_px,
        )
    }
}

/// Pixel shift applied to every hotspot for `orientation`
pub fn tilt_shift(orientation: Option<OrientationSample>, config: &ProjectionConfig) -> (f64, f64) {
    match orientation {
        Some(o) => (
            o.gamma * config.sensitivity_px_per_degree,
            (o.beta - config.neutral_tilt_deg) * config.sensitivity_px_per_degree,
        ),
        None => (0.0, 0.0),
    }
}

pub fn depth_scale(index: usize, config: &ProjectionConfig) -> f64 {
    let depth = config.depth_base + index as f64 * config.depth_step;
    1.0 / (depth * config.depth_factor)
}

/// Project the whole catalog, in catalog order
pub fn project(
    catalog: &[HotspotDefinition],
    orientation: Option<OrientationSample>,
    config: &ProjectionConfig,
) -> Vec<ProjectedHotspot> {
    let (shift_x_px, shift_y_px) = tilt_shift(orientation, config);
    catalog
        .iter()
        .enumerate()
        .map(|(index, spot)| ProjectedHotspot {
            index,
            id: spot.id.clone(),
            base: spot.scene,
            shift_x_px,
            shift_y_px,
            scale: depth_scale(index, config),
        })
        .collect()
}
