//! Backend selection for the content gateway

use content_gateway::{
    CompletionBackend, CompletionRequest, CompletionResponse, GeminiBackend, MockBackend,
};
use contracts::GatewayConfig;
use tracing::{info, warn};

use crate::error::CliError;

/// Backend chosen at startup
pub enum AnyBackend {
    Offline(MockBackend),
    Gemini(GeminiBackend),
}

impl AnyBackend {
    /// Live backend, or an error if no API key is configured
    pub fn live(config: &GatewayConfig) -> Result<Self, CliError> {
        let backend = GeminiBackend::from_config(config)
            .map_err(|e| CliError::backend_unavailable(e.to_string()))?;
        info!(model = %config.model, "using live completion backend");
        Ok(Self::Gemini(backend))
    }

    /// Live backend when possible, offline fallbacks otherwise
    pub fn live_or_offline(config: &GatewayConfig) -> Self {
        match Self::live(config) {
            Ok(backend) => backend,
            Err(e) => {
                warn!(error = %e, "falling back to offline content");
                Self::offline()
            }
        }
    }

    pub fn offline() -> Self {
        Self::Offline(MockBackend::offline())
    }
}

impl CompletionBackend for AnyBackend {
    fn name(&self) -> &str {
        match self {
            AnyBackend::Offline(b) => b.name(),
            AnyBackend::Gemini(b) => b.name(),
        }
    }

    async fn complete(&self, request: CompletionRequest) -> content_gateway::Result<CompletionResponse> {
        match self {
            AnyBackend::Offline(b) => b.complete(request).await,
            AnyBackend::Gemini(b) => b.complete(request).await,
        }
    }
}
