//! Mock 补全后端
//!
//! 用于单元测试与离线运行，支持脚本化响应、注入失败与延迟。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::backend::{CompletionBackend, CompletionRequest, CompletionResponse};
use crate::error::{GatewayError, Result};

type Responder = Arc<dyn Fn(&CompletionRequest) -> Result<CompletionResponse> + Send + Sync>;

/// Mock backend behaviour
#[derive(Clone, Default)]
enum Script {
    /// Every request fails with a transport error
    #[default]
    Offline,
    /// Pop one canned reply per request; fail when exhausted
    Queue(Arc<Mutex<VecDeque<Result<String>>>>),
    /// Compute the reply from the request
    Responder(Responder),
}

/// In-process backend with a call counter and optional latency
#[derive(Clone, Default)]
pub struct MockBackend {
    script: Script,
    latency: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Backend whose every call fails
    pub fn offline() -> Self {
        Self::default()
    }

    /// Backend replying with the given results in order
    pub fn scripted(replies: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            script: Script::Queue(Arc::new(Mutex::new(replies.into_iter().collect()))),
            ..Self::default()
        }
    }

    /// Backend replying through `f`
    pub fn responding<F>(f: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<CompletionResponse> + Send + Sync + 'static,
    {
        Self {
            script: Script::Responder(Arc::new(f)),
            ..Self::default()
        }
    }

    /// Backend that echoes a fixed text for every prompt
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::responding(move |_| Ok(CompletionResponse::new(text.clone())))
    }

    /// Delay every reply (simulates network latency)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of requests received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        match &self.script {
            Script::Offline => Err(GatewayError::Transport("mock backend offline".to_string())),
            Script::Queue(queue) => {
                let next = queue
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();
                match next {
                    Some(reply) => reply.map(CompletionResponse::new),
                    None => Err(GatewayError::Transport("mock script exhausted".to_string())),
                }
            }
            Script::Responder(f) => f(request),
        }
    }
}

impl CompletionBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(call, structured = request.is_structured(), "mock completion");

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.reply(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_fails() {
        let backend = MockBackend::offline();
        let result = backend.complete(CompletionRequest::text("x")).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_in_order() {
        let backend = MockBackend::scripted([Ok("first".to_string()), Err(GatewayError::EmptyResponse)]);
        let first = backend.complete(CompletionRequest::text("a")).await.unwrap();
        assert_eq!(first.text, "first");
        assert!(backend.complete(CompletionRequest::text("b")).await.is_err());
        assert!(backend.complete(CompletionRequest::text("c")).await.is_err());
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_counter() {
        let backend = MockBackend::always("ok");
        let clone = backend.clone();
        clone.complete(CompletionRequest::text("a")).await.unwrap();
        assert_eq!(backend.calls(), 1);
    }
}
