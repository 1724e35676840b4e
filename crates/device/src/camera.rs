//! Mock camera
//!
//! Stands in for the platform camera. Clones share state, so a test can
//! keep a handle while the capture manager owns another and inspect
//! which streams are still running.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use contracts::{CameraDevice, CaptureConstraints, CaptureError, MediaStream};
use tracing::debug;

#[derive(Default)]
struct CameraState {
    streams: Vec<Arc<AtomicUsize>>,
    failures: VecDeque<CaptureError>,
    last_constraints: Option<CaptureConstraints>,
    open_count: usize,
}

/// Shared-state fake camera
#[derive(Clone, Default)]
pub struct MockCamera {
    state: Arc<Mutex<CameraState>>,
    stop_calls: Arc<AtomicUsize>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CameraState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next `open` fail with `error`
    pub fn fail_next(&self, error: CaptureError) {
        self.lock().failures.push_back(error);
    }

    /// Number of `open` attempts, failed ones included
    pub fn open_count(&self) -> usize {
        self.lock().open_count
    }

    /// Tracks still running across every stream handed out
    pub fn live_tracks(&self) -> usize {
        self.lock()
            .streams
            .iter()
            .map(|tracks| tracks.load(Ordering::SeqCst))
            .sum()
    }

    /// Number of `stop_all_tracks` calls
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Simulate the OS revoking the camera: every track ends
    pub fn interrupt(&self) {
        for tracks in &self.lock().streams {
            tracks.store(0, Ordering::SeqCst);
        }
    }

    pub fn last_constraints(&self) -> Option<CaptureConstraints> {
        self.lock().last_constraints
    }
}

impl CameraDevice for MockCamera {
    fn name(&self) -> &str {
        "mock-camera"
    }

    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError> {
        let mut state = self.lock();
        state.open_count += 1;
        state.last_constraints = Some(*constraints);

        if let Some(error) = state.failures.pop_front() {
            debug!(error = %error, "mock camera open failed");
            return Err(error);
        }

        let track_count = if constraints.audio { 2 } else { 1 };
        let tracks = Arc::new(AtomicUsize::new(track_count));
        state.streams.push(tracks.clone());

        let stream = MockStream {
            id: format!("mock-stream-{}", state.open_count),
            tracks,
            stop_calls: self.stop_calls.clone(),
        };
        debug!(stream = %stream.id, tracks = track_count, "mock camera opened");
        Ok(Box::new(stream))
    }
}

/// Stream handed out by [`MockCamera`]
pub struct MockStream {
    id: String,
    tracks: Arc<AtomicUsize>,
    stop_calls: Arc<AtomicUsize>,
}

impl MediaStream for MockStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn live_tracks(&self) -> usize {
        self.tracks.load(Ordering::SeqCst)
    }

    fn stop_all_tracks(&mut self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.tracks.store(0, Ordering::SeqCst);
    }
}
