//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{ArBlueprint, TrackerConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    site: SiteInfo,
    hotspots: Vec<HotspotInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracker: Option<TrackerConfig>,
    gateway: GatewayInfo,
}

#[derive(Serialize)]
struct SiteInfo {
    name: String,
    category: String,
    location: String,
    rating: f64,
    reviews: u32,
}

#[derive(Serialize)]
struct HotspotInfo {
    id: String,
    label: String,
    category: String,
    icon: String,
    scene: (f64, f64),
    distance: String,
    /// Synthesized from the site because the catalog is empty
    synthesized: bool,
}

#[derive(Serialize)]
struct GatewayInfo {
    model: String,
    ttl_secs: u64,
    max_entries: usize,
    api_key_env: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let blueprint = super::load_blueprint(args.config.as_deref())?;
    info!(site = %blueprint.site.name, "Loaded configuration info");

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &ArBlueprint, args: &InfoArgs) -> ConfigInfo {
    let site = &blueprint.site;
    let hotspots = site
        .catalog()
        .into_iter()
        .map(|spot| HotspotInfo {
            synthesized: spot.id.is_fallback(),
            id: spot.id.to_string(),
            label: spot.label,
            category: spot.category,
            icon: spot.icon.glyph().to_string(),
            scene: (spot.scene.x, spot.scene.y),
            distance: spot.distance,
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        site: SiteInfo {
            name: site.name.clone(),
            category: site.category.clone(),
            location: site.location.clone(),
            rating: site.rating,
            reviews: site.reviews,
        },
        hotspots,
        tracker: args.tracker.then(|| blueprint.tracker.clone()),
        gateway: GatewayInfo {
            model: blueprint.gateway.model.clone(),
            ttl_secs: blueprint.gateway.ttl_secs,
            max_entries: blueprint.gateway.max_entries,
            api_key_env: blueprint.gateway.api_key_env.clone(),
        },
    }
}

fn print_config_info(blueprint: &ArBlueprint, args: &InfoArgs) {
    let site = &blueprint.site;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  AR HUD Configuration                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📍 Site");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Name: {}", site.name);
    println!("   ├─ Category: {}", site.category);
    println!("   ├─ Location: {}", site.location);
    println!("   └─ Rating: {:.1} ({} reviews)", site.rating, site.reviews);

    let catalog = site.catalog();
    println!("\n🎯 Hotspots ({})", catalog.len());
    for (i, spot) in catalog.iter().enumerate() {
        let prefix = if i == catalog.len() - 1 { "└─" } else { "├─" };
        let marker = if spot.id.is_fallback() { " [site]" } else { "" };
        println!(
            "   {} {} - {} ({}, {}) @ ({:.0}, {:.0}){}",
            prefix,
            spot.id,
            spot.label,
            spot.icon.glyph(),
            spot.distance,
            spot.scene.x,
            spot.scene.y,
            marker
        );
    }

    if args.tracker {
        let tracker = &blueprint.tracker;
        println!("\n⚙️  Tracker");
        println!(
            "   ├─ Tilt sensitivity: {} px/deg (neutral {}°)",
            tracker.projection.sensitivity_px_per_degree, tracker.projection.neutral_tilt_deg
        );
        println!(
            "   ├─ Lock-on: < {} from ({}, {})",
            tracker.lock_on.threshold, tracker.lock_on.center_x, tracker.lock_on.center_y
        );
        println!(
            "   ├─ Stability: [{}, {}], warning below {}",
            tracker.stability.floor, tracker.stability.ceiling, tracker.stability.warning_below
        );
        println!("   └─ Scan: {} ms", tracker.scan.duration_ms);
    }

    println!("\n🤖 Content Gateway");
    println!("   ├─ Model: {}", blueprint.gateway.model);
    println!(
        "   └─ Cache: {} entries, {}s TTL",
        blueprint.gateway.max_entries, blueprint.gateway.ttl_secs
    );

    println!();
}
