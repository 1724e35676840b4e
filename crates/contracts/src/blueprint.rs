//! ArBlueprint - Config Loader output
//!
//! Describes one AR view deployment: tracker tuning, camera constraints,
//! generative gateway settings and the site whose hotspots are shown.

use serde::{Deserialize, Serialize};

use crate::{CaptureConstraints, Site, TrackerConfig};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete AR view configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArBlueprint {
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub camera: CaptureConstraints,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub site: Site,
}

/// Generative content gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Cache entry lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached entries before LRU eviction
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Completion model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Backend base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature (backend default when absent)
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_ttl_secs() -> u64 {
    600
}

fn default_max_entries() -> usize {
    64
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            temperature: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let blueprint: ArBlueprint = serde_json::from_str("{}").unwrap();
        assert_eq!(blueprint.gateway.ttl_secs, 600);
        assert_eq!(blueprint.tracker.lock_on.threshold, 15.0);
        assert_eq!(blueprint.camera.ideal_width, 1920);
        assert_eq!(blueprint.site.name, "Sabah Museum");
    }
}
