//! 相机采集生命周期
//!
//! `CaptureManager` 是相机流的唯一持有者。所有退出路径
//! （显式 teardown、重新获取、drop）都经过 `release()`。

use contracts::{CameraDevice, CaptureConstraints, CaptureError, MediaStream};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Capture state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Requesting,
    Active,
    /// Acquisition failed or the stream was lost; `acquire()` may be retried
    Denied(CaptureError),
}

impl CaptureState {
    pub fn is_active(&self) -> bool {
        matches!(self, CaptureState::Active)
    }
}

/// Serializable view of [`CaptureState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CameraStatus {
    Idle,
    Requesting,
    Active,
    Denied { reason: String },
}

impl From<&CaptureState> for CameraStatus {
    fn from(state: &CaptureState) -> Self {
        match state {
            CaptureState::Idle => CameraStatus::Idle,
            CaptureState::Requesting => CameraStatus::Requesting,
            CaptureState::Active => CameraStatus::Active,
            CaptureState::Denied(e) => CameraStatus::Denied {
                reason: e.to_string(),
            },
        }
    }
}

pub struct CaptureManager<D> {
    device: D,
    constraints: CaptureConstraints,
    state: CaptureState,
    stream: Option<Box<dyn MediaStream>>,
}

impl<D: CameraDevice> CaptureManager<D> {
    /// Open the camera, releasing any stream already held
    #[instrument(name = "capture_acquire", skip(self), fields(device = self.device.name()))]
    pub async fn acquire(&mut self) -> &CaptureState {
        self.release();
        self.state = CaptureState::Requesting;

        match self.device.open(&self.constraints).await {
            Ok(stream) => {
                info!(stream = stream.id(), tracks = stream.live_tracks(), "camera stream acquired");
                observability::record_capture_acquire("active");
                self.stream = Some(stream);
                self.state = CaptureState::Active;
            }
            Err(e) => {
                warn!(error = %e, "camera unavailable");
                observability::record_capture_acquire(capture_error_label(&e));
                self.state = CaptureState::Denied(e);
            }
        }
        &self.state
    }
}

impl<D> CaptureManager<D> {
    pub fn new(device: D, constraints: CaptureConstraints) -> Self {
        Self {
            device,
            constraints,
            state: CaptureState::Idle,
            stream: None,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn constraints(&self) -> &CaptureConstraints {
        &self.constraints
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Stop every track of the held stream, if any. Idempotent.
    ///
    /// Returns `true` if a stream was released by this call. A `Denied`
    /// state is kept so the reason stays visible.
    pub fn release(&mut self) -> bool {
        let Some(mut stream) = self.stream.take() else {
            return false;
        };

        let tracks = stream.live_tracks();
        stream.stop_all_tracks();
        observability::record_capture_release(tracks);
        info!(stream = stream.id(), tracks, "camera stream released");

        if !matches!(self.state, CaptureState::Denied(_)) {
            self.state = CaptureState::Idle;
        }
        true
    }

    /// Detect a stream that stopped delivering frames on its own
    pub fn check_stream(&mut self) -> &CaptureState {
        let lost = self.stream.as_ref().is_some_and(|s| !s.is_live());
        if lost {
            let id = self
                .stream
                .as_ref()
                .map(|s| s.id().to_string())
                .unwrap_or_default();
            warn!(stream = %id, "camera stream lost");
            self.state = CaptureState::Denied(CaptureError::StreamLost(id));
            self.release();
        }
        &self.state
    }
}

impl<D> Drop for CaptureManager<D> {
    fn drop(&mut self) {
        self.release();
    }
}

fn capture_error_label(e: &CaptureError) -> &'static str {
    match e {
        CaptureError::PermissionDenied => "permission_denied",
        CaptureError::NoDevice => "no_device",
        CaptureError::Busy(_) => "busy",
        CaptureError::StreamLost(_) => "stream_lost",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use device::MockCamera;

    fn manager(camera: &MockCamera) -> CaptureManager<MockCamera> {
        CaptureManager::new(camera.clone(), CaptureConstraints::default())
    }

    #[tokio::test]
    async fn test_acquire_success() {
        let camera = MockCamera::new();
        let mut capture = manager(&camera);
        assert_eq!(capture.acquire().await, &CaptureState::Active);
        assert_eq!(camera.live_tracks(), 1);
        assert_eq!(camera.last_constraints(), Some(CaptureConstraints::default()));
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let camera = MockCamera::new();
        let mut capture = manager(&camera);
        capture.acquire().await;

        assert!(capture.release());
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(capture.state(), &CaptureState::Idle);

        assert!(!capture.release());
        assert_eq!(camera.live_tracks(), 0);
        assert_eq!(camera.stop_calls(), 1);
    }

    #[tokio::test]
    async fn test_release_without_stream() {
        let camera = MockCamera::new();
        let mut capture = manager(&camera);
        assert!(!capture.release());
        assert_eq!(capture.state(), &CaptureState::Idle);
    }

    #[tokio::test]
    async fn test_denied_then_retry() {
        let camera = MockCamera::new();
        camera.fail_next(CaptureError::PermissionDenied);
        let mut capture = manager(&camera);

        assert_eq!(
            capture.acquire().await,
            &CaptureState::Denied(CaptureError::PermissionDenied)
        );
        assert!(!capture.has_stream());

        assert!(capture.acquire().await.is_active());
        assert_eq!(camera.open_count(), 2);
    }

    #[tokio::test]
    async fn test_reacquire_releases_previous_stream() {
        let camera = MockCamera::new();
        let mut capture = manager(&camera);
        capture.acquire().await;
        capture.acquire().await;

        assert_eq!(camera.open_count(), 2);
        assert_eq!(camera.live_tracks(), 1);
    }

    #[tokio::test]
    async fn test_stream_loss_detected() {
        let camera = MockCamera::new();
        let mut capture = manager(&camera);
        capture.acquire().await;

        camera.interrupt();
        assert!(matches!(
            capture.check_stream(),
            CaptureState::Denied(CaptureError::StreamLost(_))
        ));
        assert!(!capture.has_stream());
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let camera = MockCamera::new();
        {
            let mut capture = manager(&camera);
            capture.acquire().await;
            assert_eq!(camera.live_tracks(), 1);
        }
        assert_eq!(camera.live_tracks(), 0);
    }

    #[test]
    fn test_camera_status_view() {
        let status = CameraStatus::from(&CaptureState::Denied(CaptureError::NoDevice));
        assert_eq!(
            status,
            CameraStatus::Denied {
                reason: "no camera available".to_string()
            }
        );
    }
}
