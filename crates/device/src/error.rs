//! Device error types

use std::path::PathBuf;

use thiserror::Error;

/// Device specific error
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Recording could not be opened
    #[error("failed to open recording '{path}': {source}")]
    ReplayOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A recording line is not a valid orientation record
    #[error("invalid orientation record at line {line}: {message}")]
    ReplayParse { line: usize, message: String },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped capture error
    #[error(transparent)]
    Capture(#[from] contracts::CaptureError),
}

/// Result alias
pub type Result<T> = std::result::Result<T, DeviceError>;
