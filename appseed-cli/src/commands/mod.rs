//! CLI command implementations

pub mod config;
pub mod create;
pub mod stock;

use std::path::Path;

use anyhow::{Context, Result};
use appseed::CreateSettings;

pub use config::ConfigCommand;
pub use create::CreateCommand;
pub use stock::StockCommand;

/// Load settings, with `explicit` layered above the standard locations
pub fn load_settings(explicit: Option<&Path>) -> Result<CreateSettings> {
    let settings = match explicit {
        Some(path) => CreateSettings::load_from(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => CreateSettings::load().context("Failed to load settings")?,
    };
    tracing::debug!(?settings, "loaded settings");
    Ok(settings)
}
