//! `ask` command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use content_gateway::ContentGateway;
use contracts::{Site, SystemClock};
use serde_json::json;
use tracing::info;

use crate::backend::AnyBackend;
use crate::cli::{AskArgs, AskQuery};
use crate::error::CliError;

/// Execute the `ask` command
pub async fn run_ask(args: &AskArgs) -> Result<()> {
    let blueprint = super::load_blueprint(args.config.as_deref())?;

    let backend = if args.offline {
        AnyBackend::offline()
    } else {
        AnyBackend::live(&blueprint.gateway)?
    };
    let gateway = ContentGateway::from_config(backend, &blueprint.gateway, Arc::new(SystemClock));

    info!(query = ?args.query, offline = args.offline, "Querying content gateway");
    let output = answer(&gateway, &blueprint.site, &args.query).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize answer")?
        );
    } else {
        print_answer(&output);
    }

    Ok(())
}

async fn answer(
    gateway: &ContentGateway<AnyBackend>,
    site: &Site,
    query: &AskQuery,
) -> Result<serde_json::Value> {
    let value = match query {
        AskQuery::Status { site: name, location } => {
            serde_json::to_value(gateway.site_status(name, location).await)?
        }
        AskQuery::Tips { attraction } => json!(gateway.travel_tips(attraction).await),
        AskQuery::Briefing { hotspot } => {
            let catalog = site.catalog();
            let spot = catalog
                .iter()
                .find(|spot| spot.id == hotspot.as_str())
                .ok_or_else(|| {
                    CliError::unknown_hotspot(hotspot, catalog.iter().map(|s| s.id.as_str()))
                })?;
            json!(gateway.hotspot_briefing(&site.name, spot).await)
        }
        AskQuery::Itinerary { destination, days } => {
            serde_json::to_value(gateway.itinerary(destination, *days).await)?
        }
        AskQuery::DayPlan { destination } => json!(gateway.day_plan(destination).await),
        AskQuery::Describe { name, location } => {
            json!(gateway.describe_location(name, location).await)
        }
    };
    Ok(value)
}

fn print_answer(value: &serde_json::Value) {
    match value {
        serde_json::Value::String(text) => println!("{text}"),
        serde_json::Value::Array(days) => {
            for day in days {
                println!(
                    "Day {} - {}",
                    day["day"],
                    day["title"].as_str().unwrap_or_default()
                );
                if let Some(activities) = day["activities"].as_array() {
                    for activity in activities {
                        println!("  • {}", activity.as_str().unwrap_or_default());
                    }
                }
            }
        }
        serde_json::Value::Object(fields) => {
            for (key, field) in fields {
                println!("{key}: {}", field.as_str().unwrap_or_default());
            }
        }
        other => println!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::GatewayConfig;

    fn offline_gateway() -> ContentGateway<AnyBackend> {
        ContentGateway::from_config(
            AnyBackend::offline(),
            &GatewayConfig::default(),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn test_offline_briefing_for_fallback_hotspot() {
        let site = Site::default();
        let id = site.catalog()[0].id.to_string();
        let value = answer(&offline_gateway(), &site, &AskQuery::Briefing { hotspot: id })
            .await
            .unwrap();
        assert!(value.as_str().unwrap().contains("Sabah Museum"));
    }

    #[tokio::test]
    async fn test_unknown_hotspot() {
        let query = AskQuery::Briefing {
            hotspot: "nowhere".to_string(),
        };
        let err = answer(&offline_gateway(), &Site::default(), &query)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown hotspot 'nowhere'"));
    }

    #[tokio::test]
    async fn test_offline_itinerary_has_requested_days() {
        let query = AskQuery::Itinerary {
            destination: "Kundasang".to_string(),
            days: 2,
        };
        let value = answer(&offline_gateway(), &Site::default(), &query)
            .await
            .unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }
}
