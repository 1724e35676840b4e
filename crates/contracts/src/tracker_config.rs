//! Tracker configuration contracts shared across crates.
//!
//! The defaults reproduce the tuning of the shipped AR view. None of the
//! values are physical calibration; they exist so a device class can be
//! tuned without code changes.

use serde::{Deserialize, Serialize};

use crate::NormalizedPoint;

/// AR tracker configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub projection: ProjectionConfig,

    #[serde(default)]
    pub lock_on: LockOnConfig,

    #[serde(default)]
    pub stability: StabilityConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

/// Screen-space projection of hotspots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Pixels of sway per degree of tilt (K)
    pub sensitivity_px_per_degree: f64,
    /// Forward tilt considered "at rest", in degrees
    pub neutral_tilt_deg: f64,
    /// Depth of the first hotspot in the catalog
    pub depth_base: f64,
    /// Depth added per catalog position
    pub depth_step: f64,
    /// Divisor applied to depth when computing scale
    pub depth_factor: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            sensitivity_px_per_degree: 3.5,
            neutral_tilt_deg: 45.0,
            depth_base: 1.0,
            depth_step: 0.5,
            depth_factor: 0.75,
        }
    }
}

/// Automatic lock-on to the hotspot nearest the viewport center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockOnConfig {
    /// Hotspots must be strictly closer than this (normalized units)
    pub threshold: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl LockOnConfig {
    pub fn center(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.center_x, self.center_y)
    }
}

impl Default for LockOnConfig {
    fn default() -> Self {
        Self {
            threshold: 15.0,
            center_x: 50.0,
            center_y: 50.0,
        }
    }
}

/// Stability score smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Score before the first sample
    pub initial_score: u32,
    /// Lowest possible score
    pub floor: u32,
    /// Highest possible score
    pub ceiling: u32,
    /// Score lost per degree of inter-sample rotation
    pub delta_gain: f64,
    /// Weight of the newest target in the moving average
    pub smoothing: f64,
    /// Scores strictly below this raise the low-stability warning
    pub warning_below: u32,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            initial_score: 100,
            floor: 20,
            ceiling: 100,
            delta_gain: 5.0,
            smoothing: 0.1,
            warning_below: 65,
        }
    }
}

/// Session timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Warm-up period after entering the view, no interaction allowed
    pub duration_ms: u64,
    /// How long the capture flash stays visible
    pub capture_flash_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            duration_ms: 3500,
            capture_flash_ms: 150,
        }
    }
}
