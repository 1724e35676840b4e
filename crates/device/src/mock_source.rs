//! Mock 姿态源
//!
//! 在后台线程中模拟手持设备姿态：缓慢的航向漂移、围绕中性倾角的
//! 正弦摆动以及随机抖动。

use std::f64::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{OrientationCallback, OrientationSample, OrientationSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Mock source configuration
#[derive(Debug, Clone)]
pub struct MockOrientationConfig {
    /// Samples per second
    pub rate_hz: f64,
    /// Forward tilt the sway oscillates around (degrees)
    pub neutral_beta: f64,
    /// Peak sway of beta and gamma (degrees)
    pub sway_amplitude_deg: f64,
    /// Duration of one sway cycle
    pub sway_period: Duration,
    /// Heading drift (degrees per second)
    pub heading_drift_deg_per_s: f64,
    /// Uniform noise added to every axis (degrees, +/-)
    pub jitter_deg: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for MockOrientationConfig {
    fn default() -> Self {
        Self {
            rate_hz: 30.0,
            neutral_beta: 45.0,
            sway_amplitude_deg: 3.0,
            sway_period: Duration::from_secs(4),
            heading_drift_deg_per_s: 2.0,
            jitter_deg: 0.3,
            seed: None,
        }
    }
}

impl MockOrientationConfig {
    /// Pose at `elapsed` seconds, before jitter
    pub fn pose_at(&self, elapsed: f64) -> OrientationSample {
        let phase = TAU * elapsed / self.sway_period.as_secs_f64().max(0.001);
        OrientationSample::new(
            (elapsed * self.heading_drift_deg_per_s).rem_euclid(360.0),
            self.neutral_beta + self.sway_amplitude_deg * phase.sin(),
            self.sway_amplitude_deg * 0.5 * (phase * 0.5).cos(),
        )
    }
}

/// Simulated device orientation sensor
pub struct MockOrientationSource {
    name: String,
    config: MockOrientationConfig,
    listening: Arc<AtomicBool>,
    emitter: Mutex<Option<JoinHandle<()>>>,
}

impl MockOrientationSource {
    pub fn new(name: impl Into<String>, config: MockOrientationConfig) -> Self {
        Self {
            name: name.into(),
            config,
            listening: Arc::new(AtomicBool::new(false)),
            emitter: Mutex::new(None),
        }
    }

    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::new(name, MockOrientationConfig::default())
    }

    pub fn config(&self) -> &MockOrientationConfig {
        &self.config
    }

    fn take_emitter(&self) -> Option<JoinHandle<()>> {
        self.emitter
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl OrientationSource for MockOrientationSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn listen(&self, callback: OrientationCallback) {
        // Idempotent: if already listening, don't start again
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(previous) = self.take_emitter() {
            let _ = previous.join();
        }

        let name = self.name.clone();
        let config = self.config.clone();
        let listening = self.listening.clone();
        let interval = Duration::from_secs_f64(1.0 / config.rate_hz.max(0.1));

        let handle = thread::spawn(move || {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let start = Instant::now();
            let mut emitted: u64 = 0;

            debug!(source = %name, rate_hz = config.rate_hz, "mock orientation started");

            while listening.load(Ordering::Relaxed) {
                let pose = config.pose_at(start.elapsed().as_secs_f64());
                let jitter = config.jitter_deg.abs();
                let mut noise = || {
                    if jitter > 0.0 {
                        rng.random_range(-jitter..=jitter)
                    } else {
                        0.0
                    }
                };
                let sample = OrientationSample::from_raw(
                    Some(pose.alpha + noise()),
                    Some(pose.beta + noise()),
                    Some(pose.gamma + noise()),
                );

                callback(sample);
                emitted += 1;
                trace!(source = %name, emitted, "mock orientation sample");

                thread::sleep(interval);
            }

            debug!(source = %name, emitted, "mock orientation stopped");
        });
        *self
            .emitter
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle);
    }

    /// Stop emitting and wait for the emitter thread to exit
    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        if let Some(handle) = self.take_emitter() {
            let _ = handle.join();
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

impl Drop for MockOrientationSource {
    fn drop(&mut self) {
        self.stop();
    }
}
