//! Layered error definitions
//!
//! Categorized by source: config / capture / general

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Capture Errors =====
    /// Camera could not be opened or was lost
    #[error(transparent)]
    Capture(#[from] CaptureError),

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Camera acquisition failure
///
/// Every variant is recoverable: the view shows a retry action that
/// re-runs acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// User or platform refused camera access
    #[error("camera permission denied")]
    PermissionDenied,

    /// No camera matches the constraints
    #[error("no camera available")]
    NoDevice,

    /// Camera is held by another application
    #[error("camera busy: {0}")]
    Busy(String),

    /// A previously live stream stopped delivering frames
    #[error("camera stream lost: {0}")]
    StreamLost(String),
}
