//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the AR tracker:
//! catalog and sensor data types, configuration, and the device traits the
//! session is driven through. Business crates depend on this crate only.
//!
//! ## Time Model
//! - Wall-clock time is epoch milliseconds (`i64`) read through [`Clock`]
//! - Orientation samples carry no timestamp; arrival order is the only order

mod blueprint;
mod capture;
mod clock;
mod error;
mod hotspot;
mod hotspot_id;
mod orientation;
mod orientation_source;
mod permission;
mod tracker_config;

pub use blueprint::*;
pub use capture::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::*;
pub use hotspot::*;
pub use hotspot_id::HotspotId;
pub use orientation::*;
pub use orientation_source::{OrientationCallback, OrientationSource};
pub use permission::*;
pub use tracker_config::*;
