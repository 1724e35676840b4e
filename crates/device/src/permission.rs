//! Permission gates
//!
//! `AmbientPermission` models platforms that deliver orientation events
//! without asking. `ConsentPermission` models platforms that need an
//! explicit grant and answers with a preset decision.

use std::time::Duration;

use contracts::{PermissionDecision, PermissionGate};
use tracing::debug;

/// Platform without a consent prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientPermission;

impl PermissionGate for AmbientPermission {
    fn requires_consent(&self) -> bool {
        false
    }

    async fn request(&self) -> PermissionDecision {
        PermissionDecision::Granted
    }
}

/// Platform that prompts the user, answering with a fixed decision
#[derive(Debug, Clone)]
pub struct ConsentPermission {
    decision: PermissionDecision,
    prompt_delay: Duration,
}

impl ConsentPermission {
    pub fn grant() -> Self {
        Self {
            decision: PermissionDecision::Granted,
            prompt_delay: Duration::ZERO,
        }
    }

    pub fn deny() -> Self {
        Self {
            decision: PermissionDecision::Denied,
            prompt_delay: Duration::ZERO,
        }
    }

    /// Simulate the user taking a while to answer
    pub fn with_prompt_delay(mut self, delay: Duration) -> Self {
        self.prompt_delay = delay;
        self
    }
}

impl PermissionGate for ConsentPermission {
    fn requires_consent(&self) -> bool {
        true
    }

    async fn request(&self) -> PermissionDecision {
        if !self.prompt_delay.is_zero() {
            tokio::time::sleep(self.prompt_delay).await;
        }
        debug!(decision = ?self.decision, "consent prompt answered");
        self.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ambient_grants_without_consent() {
        let gate = AmbientPermission;
        assert!(!gate.requires_consent());
        assert!(gate.request().await.is_granted());
    }

    #[tokio::test]
    async fn test_consent_decisions() {
        let granted = ConsentPermission::grant();
        assert!(granted.requires_consent());
        assert_eq!(granted.request().await, PermissionDecision::Granted);

        let denied = ConsentPermission::deny().with_prompt_delay(Duration::from_millis(5));
        assert_eq!(denied.request().await, PermissionDecision::Denied);
    }
}
