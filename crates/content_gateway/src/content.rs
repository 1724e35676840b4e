//! Typed gateway results
//!
//! Structured operations ask the backend for JSON matching a schema and
//! parse it here. Anything that does not parse, or parses into an empty
//! value, is rejected so the caller falls back.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{GatewayError, Result};

/// Live status summary of a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStatus {
    pub crowd_level: String,
    pub weather: String,
    pub best_time: String,
    pub summary: String,
}

impl SiteStatus {
    pub fn schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "crowdLevel": { "type": "STRING", "description": "Low, Moderate or High" },
                "weather": { "type": "STRING" },
                "bestTime": { "type": "STRING" },
                "summary": { "type": "STRING" }
            },
            "required": ["crowdLevel", "weather", "bestTime", "summary"]
        })
    }

    fn is_complete(&self) -> bool {
        [&self.crowd_level, &self.weather, &self.best_time, &self.summary]
            .iter()
            .all(|s| !s.trim().is_empty())
    }
}

/// One day of a multi-day plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub activities: Vec<String>,
}

impl ItineraryDay {
    pub fn schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "day": { "type": "INTEGER" },
                    "title": { "type": "STRING" },
                    "activities": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["day", "title", "activities"]
            }
        })
    }
}

/// Value held by the gateway cache
#[derive(Debug, Clone, PartialEq)]
pub enum CachedContent {
    Text(String),
    Status(SiteStatus),
    Itinerary(Vec<ItineraryDay>),
}

/// Strip a markdown code fence the model sometimes wraps JSON in
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}

pub(crate) fn parse_text(raw: &str) -> Result<CachedContent> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(CachedContent::Text(text.to_string()))
}

pub(crate) fn parse_status(raw: &str) -> Result<CachedContent> {
    let status: SiteStatus = serde_json::from_str(strip_fence(raw))?;
    if !status.is_complete() {
        return Err(GatewayError::malformed("status has empty fields"));
    }
    Ok(CachedContent::Status(status))
}

pub(crate) fn parse_itinerary(raw: &str) -> Result<CachedContent> {
    let days: Vec<ItineraryDay> = serde_json::from_str(strip_fence(raw))?;
    if days.is_empty() {
        return Err(GatewayError::malformed("itinerary has no days"));
    }
    if days.iter().any(|d| d.title.trim().is_empty() || d.activities.is_empty()) {
        return Err(GatewayError::malformed("itinerary day without title or activities"));
    }
    Ok(CachedContent::Itinerary(days))
}
