//! Completion backend contract

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One prompt sent to the completion service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,

    /// JSON schema the response must follow (JSON mode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<serde_json::Value>,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            schema: None,
        }
    }

    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            prompt: prompt.into(),
            schema: Some(schema),
        }
    }

    pub fn is_structured(&self) -> bool {
        self.schema.is_some()
    }
}

/// Raw completion text
///
/// For structured requests this is the JSON document produced by the
/// backend; the gateway parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
}

impl CompletionResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// External text/JSON completion service
#[trait_variant::make(CompletionBackend: Send)]
pub trait LocalCompletionBackend {
    /// Backend name (for logs)
    fn name(&self) -> &str;

    /// Issue exactly one request; no retries
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}
