//! 稳定度评分
//!
//! 每个样本：
//! 1. `delta` = 相对上一样本的旋转量绝对值之和（首个样本为 0）
//! 2. `target` = `clamp(ceiling - delta * gain, floor, ceiling)`
//! 3. `score` = `floor(score * (1 - smoothing) + target * smoothing)`
//!
//! 分数始终位于 `[floor, ceiling]`。

use contracts::{OrientationSample, StabilityConfig};
use serde::Serialize;

/// Result of feeding one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityReading {
    pub score: u32,
    pub low_stability: bool,
    /// Rotation since the previous sample, in degrees
    pub delta: f64,
}

/// `true` when `score` is below the warning threshold (no hysteresis)
pub fn is_low_stability(score: u32, config: &StabilityConfig) -> bool {
    score < config.warning_below
}

/// Smoothed stability score over an orientation stream
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    config: StabilityConfig,
    score: u32,
    previous: Option<OrientationSample>,
}

impl StabilityTracker {
    pub fn new(config: StabilityConfig) -> Self {
        let score = config.initial_score.clamp(config.floor, config.ceiling);
        Self {
            config,
            score,
            previous: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_low(&self) -> bool {
        is_low_stability(self.score, &self.config)
    }

    /// Latest sample seen
    pub fn current(&self) -> Option<OrientationSample> {
        self.previous
    }

    pub fn update(&mut self, sample: OrientationSample) -> StabilityReading {
        let floor = self.config.floor as f64;
        let ceiling = self.config.ceiling as f64;

        let delta = self
            .previous
            .map(|prev| sample.angular_delta(&prev))
            .unwrap_or(0.0);
        let target = (ceiling - delta * self.config.delta_gain).clamp(floor, ceiling);

        let smoothing = self.config.smoothing;
        let smoothed = (self.score as f64 * (1.0 - smoothing) + target * smoothing).floor();
        self.score = smoothed.clamp(floor, ceiling) as u32;
        self.previous = Some(sample);

        StabilityReading {
            score: self.score,
            low_stability: self.is_low(),
            delta,
        }
    }

    /// Back to the initial score with no previous sample
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

impl Default for StabilityTracker {
    fn default() -> Self {
        Self::new(StabilityConfig::default())
    }
}
