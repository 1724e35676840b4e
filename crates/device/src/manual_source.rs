//! Push-driven orientation source
//!
//! Samples are delivered only when `emit` is called, which makes session
//! behaviour fully deterministic in tests and scripted runs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use contracts::{OrientationCallback, OrientationSample, OrientationSource, RawOrientationEvent};
use tracing::trace;

pub struct ManualSource {
    name: String,
    listening: AtomicBool,
    delivered: AtomicU64,
    callback: Mutex<Option<OrientationCallback>>,
}

impl ManualSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listening: AtomicBool::new(false),
            delivered: AtomicU64::new(0),
            callback: Mutex::new(None),
        }
    }

    /// Deliver `sample` to the subscriber; returns `false` if nobody listens
    pub fn emit(&self, sample: OrientationSample) -> bool {
        // clone the callback out so it runs without the lock held
        let callback = self.callback_slot().clone();
        match callback {
            Some(cb) if self.is_listening() => {
                cb(sample);
                self.delivered.fetch_add(1, Ordering::Relaxed);
                trace!(source = %self.name, "manual sample emitted");
                true
            }
            _ => false,
        }
    }

    /// Deliver a raw platform event, sanitized first
    pub fn emit_raw(&self, event: RawOrientationEvent) -> bool {
        self.emit(event.into())
    }

    /// Samples delivered so far
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    fn callback_slot(&self) -> MutexGuard<'_, Option<OrientationCallback>> {
        self.callback.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OrientationSource for ManualSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn listen(&self, callback: OrientationCallback) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }
        *self.callback_slot() = Some(callback);
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        self.callback_slot().take();
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}
