//! Headless session orchestration.

mod orchestrator;
mod sink;
mod stats;

pub use orchestrator::{SessionConfig, SessionRunner, SourceSetup};
pub use stats::SessionStats;
