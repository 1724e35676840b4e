//! Fixed content returned when the backend cannot be used
//!
//! Callers render these directly, so each one reads as ordinary travel
//! content.

use crate::content::{ItineraryDay, SiteStatus};

pub const TRAVEL_TIPS: &str = "Keep hydrated and check the weather forecast!";

/// Longest itinerary the gateway will plan
pub const MAX_ITINERARY_DAYS: u32 = 14;

pub fn site_status() -> SiteStatus {
    SiteStatus {
        crowd_level: "Moderate".to_string(),
        weather: "Warm with a chance of afternoon showers".to_string(),
        best_time: "Early morning".to_string(),
        summary: "Open today. Expect steady visitor traffic around midday.".to_string(),
    }
}

pub fn hotspot_briefing(label: &str, site: &str) -> String {
    format!(
        "{label} is one of the highlights of {site}. Take a moment to look around \
         and check the on-site signage for more details."
    )
}

pub fn day_plan(destination: &str) -> String {
    format!(
        "Morning: explore {destination} early while it is cool and quiet.\n\
         Afternoon: have a local lunch nearby and take a guided walk.\n\
         Evening: catch the sunset and try the night market for dinner."
    )
}

pub fn location_description(name: &str, location: &str) -> String {
    if location.trim().is_empty() {
        format!("{name} is a popular stop for visitors exploring the region.")
    } else {
        format!("{name} in {location} is a popular stop for visitors exploring the region.")
    }
}

const ITINERARY_TEMPLATE: [(&str, [&str; 3]); 3] = [
    (
        "Arrival and first look",
        ["Check in and freshen up", "Visit {d}", "Dinner at a local food court"],
    ),
    (
        "Nature and culture",
        ["Morning nature walk", "Cultural village tour", "Seafood dinner by the waterfront"],
    ),
    (
        "Markets and farewell",
        ["Handicraft market", "Relaxed lunch with a view", "Sunset stroll"],
    ),
];

/// Plan of `days` days cycling through a generic template
///
/// `days` is clamped to `1..=MAX_ITINERARY_DAYS`.
pub fn itinerary(destination: &str, days: u32) -> Vec<ItineraryDay> {
    (1..=days.clamp(1, MAX_ITINERARY_DAYS))
        .map(|day| {
            let (title, activities) = ITINERARY_TEMPLATE[(day as usize - 1) % ITINERARY_TEMPLATE.len()];
            ItineraryDay {
                day,
                title: title.to_string(),
                activities: activities
                    .iter()
                    .map(|a| a.replace("{d}", destination))
                    .collect(),
            }
        })
        .collect()
}
