//! # Content Gateway
//!
//! 为 AR 叠加层内容提供带缓存的生成式文本后端访问。
//!
//! 负责：
//! - 带过期与容量上限的缓存（`TtlCache`）
//! - 后端契约（`CompletionBackend`），含 Gemini 与 mock 实现
//! - 各操作的 prompt、类型化结果与兜底内容（`ContentGateway`）
//!
//! 网关操作从不失败：后端与解析错误记录日志后替换为固定的兜底值。

mod backend;
mod cache;
mod content;
mod error;
pub mod fallback;
mod gateway;
mod gemini;
mod mock;

pub use backend::{CompletionBackend, CompletionRequest, CompletionResponse, LocalCompletionBackend};
pub use cache::TtlCache;
pub use content::{CachedContent, ItineraryDay, SiteStatus};
pub use error::{GatewayError, Result};
pub use gateway::{ContentGateway, Operation};
pub use gemini::GeminiBackend;
pub use mock::MockBackend;
