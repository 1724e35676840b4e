//! 内容网关错误类型
//!
//! 这些错误不会离开公开的网关操作：每种错误都会被替换为该操作的兜底值。

use thiserror::Error;

/// Completion backend failure
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Backend is not usable (missing API key, bad client setup)
    #[error("backend not configured: {0}")]
    NotConfigured(String),

    /// Request never produced an HTTP response
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried no text
    #[error("backend returned an empty response")]
    EmptyResponse,

    /// Response text did not match the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GatewayError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Label used for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::NotConfigured(_) => "not_configured",
            GatewayError::Transport(_) => "transport",
            GatewayError::Status { .. } => "status",
            GatewayError::EmptyResponse => "empty",
            GatewayError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Malformed(e.to_string())
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, GatewayError>;
