//! Command implementations.

mod ask;
mod info;
mod run;
mod validate;

pub use ask::run_ask;
pub use info::run_info;
pub use run::run_session;
pub use validate::run_validate;

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ArBlueprint;
use tracing::info;

use crate::error::CliError;

/// Load the blueprint at `path`, or the built-in one when no path is given
fn load_blueprint(path: Option<&Path>) -> Result<ArBlueprint> {
    let Some(path) = path else {
        info!("No configuration given, using built-in site");
        return Ok(ArBlueprint::default());
    };

    if !path.exists() {
        return Err(CliError::config_not_found(path).into());
    }

    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
