//! Session statistics.

use std::time::Duration;

use ar_tracker::{CameraStatus, SamplerState};
use observability::SessionMetricsAggregator;

/// Statistics from one headless session
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Wall-clock length of the run
    pub duration: Duration,

    /// HUD ticks executed
    pub ticks: u64,

    /// Snapshots handed to sinks
    pub snapshots_written: u64,

    /// Briefings requested from the content gateway
    pub briefings_requested: u64,

    /// Briefings shown in the detail overlay
    pub briefings_applied: u64,

    /// Briefings that arrived after their overlay closed
    pub briefings_discarded: u64,

    /// Camera state after startup
    pub camera: CameraStatus,

    /// Sensor state after permission negotiation
    pub sensor: SamplerState,

    /// Orientation and lock-on aggregates
    pub session_metrics: SessionMetricsAggregator,
}

impl SessionStats {
    pub fn new(camera: CameraStatus, sensor: SamplerState) -> Self {
        Self {
            duration: Duration::ZERO,
            ticks: 0,
            snapshots_written: 0,
            briefings_requested: 0,
            briefings_applied: 0,
            briefings_discarded: 0,
            camera,
            sensor,
            session_metrics: SessionMetricsAggregator::new(),
        }
    }

    /// Orientation samples per second
    pub fn sample_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.session_metrics.total_samples as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Session Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        let camera = match &self.camera {
            CameraStatus::Denied { reason } => format!("denied ({reason})"),
            other => format!("{other:?}").to_lowercase(),
        };

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Ticks: {}", self.ticks);
        println!("   ├─ Snapshots written: {}", self.snapshots_written);
        println!("   ├─ Sample rate: {:.1} Hz", self.sample_rate());
        println!("   ├─ Camera: {}", camera);
        println!("   └─ Sensors: {}", self.sensor.as_str());

        println!("\n💬 Briefings");
        println!("   ├─ Requested: {}", self.briefings_requested);
        println!("   ├─ Shown: {}", self.briefings_applied);
        println!("   └─ Discarded (stale): {}", self.briefings_discarded);

        println!("\n{}", self.session_metrics.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate() {
        let mut stats = SessionStats::new(CameraStatus::Active, SamplerState::Active);
        assert_eq!(stats.sample_rate(), 0.0);

        for t in 0..30 {
            stats.session_metrics.observe(t * 33, 100, false, None);
        }
        stats.duration = Duration::from_secs(2);
        assert!((stats.sample_rate() - 15.0).abs() < 1e-9);
    }
}
