//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Hotspot id not present in the site catalog
    #[error("Unknown hotspot '{id}' (known: {known})")]
    UnknownHotspot { id: String, known: String },

    /// Live backend could not be set up
    #[error("Content backend unavailable: {message}")]
    BackendUnavailable { message: String },

    /// Snapshot output error
    #[error("Snapshot sink '{sink}' failed: {source}")]
    Sink {
        sink: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn unknown_hotspot<'a>(
        id: impl Into<String>,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::UnknownHotspot {
            id: id.into(),
            known: known.into_iter().collect::<Vec<_>>().join(", "),
        }
    }

    pub fn backend_unavailable(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
        }
    }

    pub fn sink(sink: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sink {
            sink: sink.into(),
            source,
        }
    }
}
