//! Camera capture contracts
//!
//! `CameraDevice` opens a live video stream; `MediaStream` is the opaque
//! handle whose tracks must be stopped when the AR view goes away.

use serde::{Deserialize, Serialize};

use crate::CaptureError;

/// Which physical camera to prefer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Rear-facing camera
    #[default]
    Environment,
    /// Front-facing camera
    User,
}

/// Constraints passed to the camera when opening a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConstraints {
    pub facing: FacingMode,

    /// Preferred width in pixels (best effort)
    pub ideal_width: u32,

    /// Preferred height in pixels (best effort)
    pub ideal_height: u32,

    /// Whether to capture audio as well
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: 1920,
            ideal_height: 1080,
            audio: false,
        }
    }
}

/// Live camera feed handle
pub trait MediaStream: Send {
    /// Stream identifier (for logs)
    fn id(&self) -> &str;

    /// Number of tracks still running
    fn live_tracks(&self) -> usize;

    /// Stop every track of the stream
    ///
    /// Must be idempotent.
    fn stop_all_tracks(&mut self);

    /// Whether the stream still delivers frames
    fn is_live(&self) -> bool {
        self.live_tracks() > 0
    }
}

/// Camera device capability
#[trait_variant::make(CameraDevice: Send)]
pub trait LocalCameraDevice {
    /// Device name (for logs)
    fn name(&self) -> &str;

    /// Open a stream matching `constraints` as closely as possible
    async fn open(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn MediaStream>, CaptureError>;
}
