//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::ArBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    site: String,
    hotspot_count: usize,
    lock_threshold: f64,
    cache_ttl_secs: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    site: blueprint.site.name.clone(),
                    hotspot_count: blueprint.site.hotspots.len(),
                    lock_threshold: blueprint.tracker.lock_on.threshold,
                    cache_ttl_secs: blueprint.gateway.ttl_secs,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &ArBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.site.hotspots.is_empty() {
        warnings.push(format!(
            "Site '{}' has no hotspots - the AR view will show the site itself",
            blueprint.site.name
        ));
    }

    // Hotspots that can never be locked because another sits closer to the
    // same spot are confusing but legal.
    let hotspots = &blueprint.site.hotspots;
    for (i, a) in hotspots.iter().enumerate() {
        for b in &hotspots[i + 1..] {
            if a.scene.distance_to(b.scene) < 1.0 {
                warnings.push(format!(
                    "Hotspots '{}' and '{}' overlap in the scene",
                    a.id, b.id
                ));
            }
        }
    }

    if std::env::var(&blueprint.gateway.api_key_env).is_err() {
        warnings.push(format!(
            "{} is not set - content will use offline fallbacks",
            blueprint.gateway.api_key_env
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Site: {}", summary.site);
            println!("  Hotspots: {}", summary.hotspot_count);
            println!("  Lock threshold: {}", summary.lock_threshold);
            println!("  Cache TTL: {}s", summary.cache_ttl_secs);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
