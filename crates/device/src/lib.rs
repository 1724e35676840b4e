//! # Device
//!
//! Stand-ins for the hardware the AR view talks to:
//!
//! - Orientation sources: [`ManualSource`] (push-driven),
//!   [`MockOrientationSource`] (synthetic handheld sway) and
//!   [`ReplayOrientationSource`] (JSONL recordings)
//! - Permission gates: [`AmbientPermission`], [`ConsentPermission`]
//! - Camera: [`MockCamera`]

mod camera;
mod error;
mod manual_source;
mod mock_source;
mod permission;
mod replay_source;

pub use camera::{MockCamera, MockStream};
pub use error::{DeviceError, Result};
pub use manual_source::ManualSource;
pub use mock_source::{MockOrientationConfig, MockOrientationSource};
pub use permission::{AmbientPermission, ConsentPermission};
pub use replay_source::{OrientationRecord, ReplayConfig, ReplayOrientationSource};
