//! 姿态采样器
//!
//! 持有姿态订阅与稳定度跟踪器。
//!
//! ```text
//! Unrequested ──begin(no consent)──────────────► Active
//!      │                                           ▲
//!      └──begin(consent)──► PermissionPending ─────┤ granted
//!                                  │
//!                                  └──denied──► Denied
//! any state ──teardown──► Stopped
//! ```

use std::sync::Arc;

use contracts::{
    OrientationCallback, OrientationSample, OrientationSource, PermissionDecision, StabilityConfig,
};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::stability::{StabilityReading, StabilityTracker};

/// 传感器订阅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerState {
    Unrequested,
    PermissionPending,
    Active,
    Denied,
    Stopped,
}

impl SamplerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplerState::Unrequested => "unrequested",
            SamplerState::PermissionPending => "permission_pending",
            SamplerState::Active => "active",
            SamplerState::Denied => "denied",
            SamplerState::Stopped => "stopped",
        }
    }
}

pub struct OrientationSampler {
    source: Arc<dyn OrientationSource>,
    sink: OrientationCallback,
    state: SamplerState,
    tracker: StabilityTracker,
}

impl OrientationSampler {
    /// `sink` receives raw samples once the source is subscribed
    pub fn new(
        source: Arc<dyn OrientationSource>,
        config: StabilityConfig,
        sink: OrientationCallback,
    ) -> Self {
        Self {
            source,
            sink,
            state: SamplerState::Unrequested,
            tracker: StabilityTracker::new(config),
        }
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn score(&self) -> u32 {
        self.tracker.score()
    }

    pub fn is_low_stability(&self) -> bool {
        self.tracker.is_low()
    }

    /// Latest accepted sample
    pub fn current(&self) -> Option<OrientationSample> {
        self.tracker.current()
    }

    /// Start sensing. Platforms that need consent wait in
    /// `PermissionPending` for `resolve_permission`.
    pub fn begin(&mut self, requires_consent: bool) -> SamplerState {
        if self.state != SamplerState::Unrequested {
            debug!(state = self.state.as_str(), "sampler already started");
            return self.state;
        }

        if requires_consent {
            info!(source = self.source.name(), "waiting for orientation permission");
            self.state = SamplerState::PermissionPending;
        } else {
            self.activate();
        }
        self.state
    }

    /// Apply the user's answer to the permission prompt
    ///
    /// Ignored unless the prompt is still pending (e.g. after teardown).
    pub fn resolve_permission(&mut self, decision: PermissionDecision) -> SamplerState {
        if self.state != SamplerState::PermissionPending {
            debug!(
                state = self.state.as_str(),
                ?decision,
                "late permission answer ignored"
            );
            return self.state;
        }

        if decision.is_granted() {
            self.activate();
        } else {
            warn!(source = self.source.name(), "orientation permission denied, using static placement");
            self.state = SamplerState::Denied;
        }
        self.state
    }

    /// Feed one raw sample; `None` unless the sampler is active
    pub fn ingest(&mut self, sample: OrientationSample) -> Option<StabilityReading> {
        if self.state != SamplerState::Active {
            trace!(state = self.state.as_str(), "sample dropped");
            return None;
        }

        let reading = self.tracker.update(sample);
        trace!(
            alpha = sample.alpha,
            beta = sample.beta,
            gamma = sample.gamma,
            score = reading.score,
            "orientation sample"
        );
        observability::record_orientation_sample(reading.score, reading.low_stability);
        Some(reading)
    }

    /// Unsubscribe from the source. Idempotent.
    pub fn teardown(&mut self) {
        self.source.stop();
        if self.state != SamplerState::Stopped {
            info!(source = self.source.name(), from = self.state.as_str(), "sampler stopped");
            self.state = SamplerState::Stopped;
        }
    }

    fn activate(&mut self) {
        self.source.listen(self.sink.clone());
        self.state = SamplerState::Active;
        info!(source = self.source.name(), "orientation sampling active");
    }
}

impl Drop for OrientationSampler {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records subscribe/unsubscribe calls
    #[derive(Default)]
    struct FakeSource {
        listening: AtomicBool,
        listens: AtomicUsize,
        stops: AtomicUsize,
        callback: Mutex<Option<OrientationCallback>>,
    }

    impl FakeSource {
        fn emit(&self, sample: OrientationSample) {
            if let Some(cb) = self.callback.lock().unwrap().as_ref() {
                cb(sample);
            }
        }
    }

    impl OrientationSource for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        fn listen(&self, callback: OrientationCallback) {
            self.listens.fetch_add(1, Ordering::SeqCst);
            self.listening.store(true, Ordering::SeqCst);
            *self.callback.lock().unwrap() = Some(callback);
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.listening.store(false, Ordering::SeqCst);
            self.callback.lock().unwrap().take();
        }

        fn is_listening(&self) -> bool {
            self.listening.load(Ordering::SeqCst)
        }
    }

    fn sampler() -> (OrientationSampler, Arc<FakeSource>, Arc<Mutex<Vec<OrientationSample>>>) {
        let source = Arc::new(FakeSource::default());
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink_store = received.clone();
        let sink: OrientationCallback = Arc::new(move |s| sink_store.lock().unwrap().push(s));
        let sampler = OrientationSampler::new(source.clone(), StabilityConfig::default(), sink);
        (sampler, source, received)
    }

    #[test]
    fn test_no_consent_goes_straight_to_active() {
        let (mut sampler, source, received) = sampler();
        assert_eq!(sampler.begin(false), SamplerState::Active);
        assert!(source.is_listening());

        source.emit(OrientationSample::new(1.0, 2.0, 3.0));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_consent_flow_granted() {
        let (mut sampler, source, _) = sampler();
        assert_eq!(sampler.begin(true), SamplerState::PermissionPending);
        assert!(!source.is_listening());

        assert_eq!(sampler.resolve_permission(PermissionDecision::Granted), SamplerState::Active);
        assert!(source.is_listening());
    }

    #[test]
    fn test_consent_flow_denied_never_subscribes() {
        let (mut sampler, source, _) = sampler();
        sampler.begin(true);
        assert_eq!(sampler.resolve_permission(PermissionDecision::Denied), SamplerState::Denied);
        assert_eq!(source.listens.load(Ordering::SeqCst), 0);
        assert!(sampler.ingest(OrientationSample::default()).is_none());
        assert_eq!(sampler.score(), 100);
    }

    #[test]
    fn test_teardown_while_permission_pending() {
        let (mut sampler, source, _) = sampler();
        sampler.begin(true);
        sampler.teardown();
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(source.stops.load(Ordering::SeqCst) >= 1);

        // the prompt resolving afterwards must not resubscribe
        sampler.resolve_permission(PermissionDecision::Granted);
        assert_eq!(sampler.state(), SamplerState::Stopped);
        assert!(!source.is_listening());
    }

    #[test]
    fn test_ingest_only_when_active() {
        let (mut sampler, _, _) = sampler();
        assert!(sampler.ingest(OrientationSample::default()).is_none());

        sampler.begin(false);
        let reading = sampler.ingest(OrientationSample::new(0.0, 45.0, 0.0)).unwrap();
        assert_eq!(reading.score, 100);
        assert_eq!(sampler.current(), Some(OrientationSample::new(0.0, 45.0, 0.0)));

        sampler.teardown();
        assert!(sampler.ingest(OrientationSample::default()).is_none());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (mut sampler, source, _) = sampler();
        sampler.begin(false);
        drop(sampler);
        assert!(!source.is_listening());
    }

    #[test]
    fn test_begin_twice_does_not_resubscribe() {
        let (mut sampler, source, _) = sampler();
        sampler.begin(false);
        sampler.begin(false);
        assert_eq!(source.listens.load(Ordering::SeqCst), 1);
    }
}
