//! # AR Tracker
//!
//! AR 视图的热点跟踪。
//!
//! 负责：
//! - 姿态采样与稳定度评分（`OrientationSampler`）
//! - 根据设备倾斜投影热点（`projector`）
//! - 锁定距视口中心最近的热点（`LockOnMachine`）
//! - 相机流的所有权（`CaptureManager`）
//! - 会话状态与 HUD 视图模型（`ArSession`、`HudSnapshot`）

pub mod capture;
pub mod lock_on;
pub mod projector;
pub mod sampler;
pub mod session;
pub mod snapshot;
pub mod stability;

pub use capture::{CameraStatus, CaptureManager, CaptureState};
pub use lock_on::{nearest_within, LockOnMachine, LockState, LockTransition};
pub use projector::{project, ProjectedHotspot};
pub use sampler::{OrientationSampler, SamplerState};
pub use session::{ArSession, ContentTicket, MountGuard, OrientationUpdate};
pub use snapshot::{HotspotView, HudSnapshot, MapView};
pub use stability::{is_low_stability, StabilityReading, StabilityTracker};
