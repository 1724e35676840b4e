//! PermissionGate trait - sensor permission capability
//!
//! Some platforms deliver orientation events only after an explicit,
//! asynchronous user grant; others deliver them unconditionally. The gate is
//! chosen once at startup and hides which kind of platform is running.

use serde::{Deserialize, Serialize};

/// Outcome of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionDecision {
    Granted,
    Denied,
}

impl PermissionDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionDecision::Granted)
    }
}

/// Sensor permission capability
#[trait_variant::make(PermissionGate: Send)]
pub trait LocalPermissionGate {
    /// Whether the platform needs an explicit grant before delivering events
    fn requires_consent(&self) -> bool;

    /// Ask the user for access
    ///
    /// Only called when `requires_consent` is true. Failures of the prompt
    /// itself are reported as `Denied`.
    async fn request(&self) -> PermissionDecision;
}
