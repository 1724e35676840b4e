//! OrientationSample - device rotation reading
//!
//! Angles follow the platform device-orientation convention, in degrees:
//! - `alpha`: compass heading, [0, 360)
//! - `beta`: front-back tilt, [-180, 180]
//! - `gamma`: left-right tilt, [-90, 90]

use serde::{Deserialize, Serialize};

/// One orientation reading
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationSample {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl OrientationSample {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Build a sample from a raw platform event.
    ///
    /// Platforms report `null` for axes they cannot measure; those read as 0.
    /// Non-finite values also read as 0 and the rest are folded into range.
    pub fn from_raw(alpha: Option<f64>, beta: Option<f64>, gamma: Option<f64>) -> Self {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite()).unwrap_or(0.0);
        Self {
            alpha: finite(alpha).rem_euclid(360.0),
            beta: finite(beta).clamp(-180.0, 180.0),
            gamma: finite(gamma).clamp(-90.0, 90.0),
        }
    }

    /// Sum of absolute per-axis differences, in degrees
    pub fn angular_delta(&self, previous: &OrientationSample) -> f64 {
        (self.alpha - previous.alpha).abs()
            + (self.beta - previous.beta).abs()
            + (self.gamma - previous.gamma).abs()
    }
}

/// Raw event as delivered by the platform (any axis may be missing)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RawOrientationEvent {
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
}

impl From<RawOrientationEvent> for OrientationSample {
    fn from(raw: RawOrientationEvent) -> Self {
        OrientationSample::from_raw(raw.alpha, raw.beta, raw.gamma)
    }
}
