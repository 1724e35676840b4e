//! 内容网关
//!
//! 每种内容需求对应一个方法，每个方法：
//! - 由输入生成确定性的缓存 key
//! - 缓存仍有效时直接返回
//! - 否则发起一次后端请求（不重试）
//! - 缓存并返回解析结果，失败则返回兜底内容
//!
//! 同一 key 的并发未命中共享同一次后端请求。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{Clock, GatewayConfig, HotspotDefinition};
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use crate::backend::{CompletionBackend, CompletionRequest};
use crate::cache::TtlCache;
use crate::content::{self, CachedContent, ItineraryDay, SiteStatus};
use crate::error::Result;
use crate::fallback;

/// Gateway operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SiteStatus,
    TravelTips,
    HotspotBriefing,
    Itinerary,
    DayPlan,
    LocationDescription,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SiteStatus => "site_status",
            Operation::TravelTips => "travel_tips",
            Operation::HotspotBriefing => "hotspot_briefing",
            Operation::Itinerary => "itinerary",
            Operation::DayPlan => "day_plan",
            Operation::LocationDescription => "location_description",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

type InFlight = Arc<OnceCell<Option<CachedContent>>>;
type Parser = fn(&str) -> Result<CachedContent>;

const DEFAULT_REGION: &str = "Sabah, Malaysia";

/// Cached, fallback-backed access to a completion backend
pub struct ContentGateway<B> {
    backend: B,
    cache: Arc<TtlCache<CachedContent>>,
    in_flight: Mutex<HashMap<String, InFlight>>,
    region: String,
}

impl<B: CompletionBackend + Sync> ContentGateway<B> {
    pub fn new(backend: B, cache: Arc<TtlCache<CachedContent>>) -> Self {
        Self {
            backend,
            cache,
            in_flight: Mutex::new(HashMap::new()),
            region: DEFAULT_REGION.to_string(),
        }
    }

    /// Gateway with a fresh cache sized from `config`
    pub fn from_config(backend: B, config: &GatewayConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = TtlCache::new(
            Duration::from_secs(config.ttl_secs),
            config.max_entries,
            clock,
        );
        Self::new(backend, Arc::new(cache))
    }

    /// Region mentioned in prompts
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &Arc<TtlCache<CachedContent>> {
        &self.cache
    }

    /// Crowd, weather and timing summary for a site
    #[instrument(name = "gateway_site_status", skip(self))]
    pub async fn site_status(&self, site: &str, location: &str) -> SiteStatus {
        let key = cache_key(Operation::SiteStatus, &[site, location]);
        let prompt = format!(
            "Give a short live status for visitors of {site} in {location}, {region}. \
             Report the expected crowd level (Low, Moderate or High), current weather, \
             the best time to visit today and a one-sentence summary.",
            region = self.region
        );
        let request = CompletionRequest::structured(prompt, SiteStatus::schema());

        match self.fetch(Operation::SiteStatus, key, request, content::parse_status).await {
            Some(CachedContent::Status(status)) => status,
            _ => fallback::site_status(),
        }
    }

    /// Three short travel tips for an attraction
    #[instrument(name = "gateway_travel_tips", skip(self))]
    pub async fn travel_tips(&self, attraction: &str) -> String {
        let key = cache_key(Operation::TravelTips, &[attraction]);
        let prompt = format!(
            "Give me 3 essential travel tips for visiting {attraction} in {region}. \
             Consider weather, local customs, and best time to visit.",
            region = self.region
        );

        self.fetch_text(Operation::TravelTips, key, prompt)
            .await
            .unwrap_or_else(|| fallback::TRAVEL_TIPS.to_string())
    }

    /// Detailed briefing shown when a hotspot's detail overlay opens
    #[instrument(name = "gateway_hotspot_briefing", skip(self, hotspot), fields(hotspot = %hotspot.id))]
    pub async fn hotspot_briefing(&self, site: &str, hotspot: &HotspotDefinition) -> String {
        let key = cache_key(
            Operation::HotspotBriefing,
            &[site, hotspot.id.as_str(), &hotspot.label],
        );
        let prompt = format!(
            "You are a friendly guide at {site}, {region}. In under 80 words, brief a visitor \
             standing at \"{label}\" ({category}). Mention one detail worth looking for.",
            region = self.region,
            label = hotspot.label,
            category = hotspot.category,
        );

        self.fetch_text(Operation::HotspotBriefing, key, prompt)
            .await
            .unwrap_or_else(|| fallback::hotspot_briefing(&hotspot.label, site))
    }

    /// Multi-day plan, one entry per day
    #[instrument(name = "gateway_itinerary", skip(self))]
    pub async fn itinerary(&self, destination: &str, days: u32) -> Vec<ItineraryDay> {
        let days = days.clamp(1, fallback::MAX_ITINERARY_DAYS);
        let key = cache_key(Operation::Itinerary, &[destination, &days.to_string()]);
        let prompt = format!(
            "Plan a {days}-day trip to {destination} in {region}. For each day give a short \
             title and three activities.",
            region = self.region
        );
        let request = CompletionRequest::structured(prompt, ItineraryDay::schema());

        match self.fetch(Operation::Itinerary, key, request, content::parse_itinerary).await {
            Some(CachedContent::Itinerary(mut plan)) => {
                plan.truncate(days as usize);
                plan
            }
            _ => fallback::itinerary(destination, days),
        }
    }

    /// One-day plan as free text
    #[instrument(name = "gateway_day_plan", skip(self))]
    pub async fn day_plan(&self, destination: &str) -> String {
        let key = cache_key(Operation::DayPlan, &[destination]);
        let prompt = format!(
            "Create a one-day itinerary for visiting {destination} in {region}. Include morning, \
             afternoon, and evening activities. Keep it brief and travel-oriented.",
            region = self.region
        );

        self.fetch_text(Operation::DayPlan, key, prompt)
            .await
            .unwrap_or_else(|| fallback::day_plan(destination))
    }

    /// Short description of a place
    #[instrument(name = "gateway_describe_location", skip(self))]
    pub async fn describe_location(&self, name: &str, location: &str) -> String {
        let key = cache_key(Operation::LocationDescription, &[name, location]);
        let prompt = format!(
            "Describe {name} ({location}, {region}) for a traveller in two sentences.",
            region = self.region
        );

        self.fetch_text(Operation::LocationDescription, key, prompt)
            .await
            .unwrap_or_else(|| fallback::location_description(name, location))
    }

    async fn fetch_text(&self, op: Operation, key: String, prompt: String) -> Option<String> {
        match self
            .fetch(op, key, CompletionRequest::text(prompt), content::parse_text)
            .await
        {
            Some(CachedContent::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Cache lookup, then a de-duplicated backend call. `None` means the
    /// caller must use its fallback.
    async fn fetch(
        &self,
        op: Operation,
        key: String,
        request: CompletionRequest,
        parse: Parser,
    ) -> Option<CachedContent> {
        if let Some(hit) = self.cache.get(&key) {
            debug!(operation = %op, key = %key, "cache hit");
            observability::record_cache_lookup(op.as_str(), true);
            return Some(hit);
        }
        debug!(operation = %op, key = %key, "cache miss");
        observability::record_cache_lookup(op.as_str(), false);

        let cell = {
            let mut in_flight = self.in_flight_map();
            in_flight.entry(key.clone()).or_default().clone()
        };
        if cell.initialized() {
            debug!(operation = %op, key = %key, "joined completed request");
        }

        let result = cell
            .get_or_init(|| self.call_backend(op, &key, request, parse))
            .await
            .clone();

        {
            let mut in_flight = self.in_flight_map();
            if in_flight.get(&key).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
                in_flight.remove(&key);
            }
        }
        result
    }

    async fn call_backend(
        &self,
        op: Operation,
        key: &str,
        request: CompletionRequest,
        parse: Parser,
    ) -> Option<CachedContent> {
        // a request that finished between our miss and now already cached it
        if let Some(hit) = self.cache.get(key) {
            return Some(hit);
        }

        let outcome = match self.backend.complete(request).await {
            Ok(response) => parse(&response.text),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(value) => {
                observability::record_backend_outcome(op.as_str(), "success");
                self.cache.set(key, value.clone());
                Some(value)
            }
            Err(e) => {
                warn!(
                    operation = %op,
                    backend = self.backend.name(),
                    error = %e,
                    "content request failed, using fallback"
                );
                observability::record_backend_outcome(op.as_str(), e.kind());
                None
            }
        }
    }

    fn in_flight_map(&self) -> std::sync::MutexGuard<'_, HashMap<String, InFlight>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `op:part|part` with parts trimmed and lower-cased
fn cache_key(op: Operation, parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .map(|p| p.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|");
    format!("{}:{}", op.as_str(), joined)
}
