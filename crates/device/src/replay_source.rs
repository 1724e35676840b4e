//! Replay 姿态源 - 从录制文件回放姿态数据
//!
//! 读取 JSONL 录制文件，按录制时的时间间隔回放。
//! One record per line:
//!
//! ```text
//! {"t_ms": 0, "alpha": 12.5, "beta": 44.0, "gamma": -1.2}
//! {"t_ms": 33, "alpha": null, "beta": 44.3, "gamma": -1.0}
//! ```
//!
//! Missing or null angles are sanitized like live platform events.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{OrientationCallback, OrientationSample, OrientationSource, RawOrientationEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DeviceError, Result};

/// Upper bound on one sleep so `stop()` returns promptly
const MAX_SLEEP_SLICE: Duration = Duration::from_millis(20);

/// Replay options
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Playback speed (1.0 = recorded speed)
    pub speed_multiplier: f64,
    /// Restart from the beginning when the recording ends
    pub loop_playback: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            loop_playback: false,
        }
    }
}

/// One line of a recording
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrientationRecord {
    /// Milliseconds since the start of the recording
    pub t_ms: u64,
    #[serde(flatten)]
    pub event: RawOrientationEvent,
}

pub struct ReplayOrientationSource {
    name: String,
    records: Arc<Vec<(u64, OrientationSample)>>,
    config: ReplayConfig,
    listening: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReplayOrientationSource {
    /// Load a JSONL recording
    pub fn load(path: &Path, config: ReplayConfig) -> Result<Self> {
        let file = File::open(path).map_err(|source| DeviceError::ReplayOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: OrientationRecord =
                serde_json::from_str(&line).map_err(|e| DeviceError::ReplayParse {
                    line: idx + 1,
                    message: e.to_string(),
                })?;
            records.push((record.t_ms, OrientationSample::from(record.event)));
        }

        // stable sort keeps file order for equal timestamps
        records.sort_by_key(|(t, _)| *t);

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("replay")
            .to_string();
        info!(source = %name, records = records.len(), "loaded orientation recording");

        Ok(Self {
            name,
            records: Arc::new(records),
            config,
            listening: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded duration
    pub fn duration(&self) -> Duration {
        let first = self.records.first().map(|(t, _)| *t).unwrap_or(0);
        let last = self.records.last().map(|(t, _)| *t).unwrap_or(0);
        Duration::from_millis(last - first)
    }

    fn take_handle(&self) -> Option<JoinHandle<()>> {
        self.thread_handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

/// Sleep until `deadline` unless `listening` is cleared first
fn sleep_until(deadline: Instant, listening: &AtomicBool) -> bool {
    loop {
        if !listening.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(MAX_SLEEP_SLICE));
    }
}

impl OrientationSource for ReplayOrientationSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn listen(&self, callback: OrientationCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }
        // reap a thread that finished on its own
        if let Some(handle) = self.take_handle() {
            let _ = handle.join();
        }

        let name = self.name.clone();
        let records = self.records.clone();
        let listening = self.listening.clone();
        let speed = self.config.speed_multiplier.max(0.1);
        let loop_playback = self.config.loop_playback;

        let handle = thread::spawn(move || {
            debug!(source = %name, "replay thread started");

            'playback: loop {
                let Some(&(first_t, _)) = records.first() else {
                    warn!(source = %name, "no records to replay");
                    break;
                };

                let start = Instant::now();
                for &(t_ms, sample) in records.iter() {
                    let offset = Duration::from_secs_f64((t_ms - first_t) as f64 / 1000.0 / speed);
                    if !sleep_until(start + offset, &listening) {
                        debug!(source = %name, "replay stopped");
                        break 'playback;
                    }
                    callback(sample);
                }

                if !loop_playback {
                    info!(source = %name, "replay completed");
                    break;
                }
                debug!(source = %name, "looping replay");
            }

            listening.store(false, Ordering::SeqCst);
        });

        *self
            .thread_handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle);
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);

        if let Some(handle) = self.take_handle() {
            let _ = handle.join();
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

impl Drop for ReplayOrientationSource {
    fn drop(&mut self) {
        self.stop();
    }
}
