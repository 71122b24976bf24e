//! Stock template maintenance commands

use anyhow::{Context, Result};
use appseed::stock::StockAssets;
use appseed::CreateSettings;
use console::style;

/// Stock template subcommands
#[derive(Debug, Clone, Copy)]
pub enum StockCommand {
    /// Print where the stock template lives
    Path,
    /// Rewrite the unpacked copy from the embedded files
    Refresh,
}

impl StockCommand {
    /// Execute the command
    pub fn execute(self, settings: &CreateSettings) -> Result<()> {
        match self {
            Self::Path => {
                let stock = StockAssets::prepare(settings).context("Failed to locate stock template")?;
                println!("{}", stock.package_dir().display());
            }
            Self::Refresh => {
                if let Some(dir) = &settings.stock_template {
                    anyhow::bail!(
                        "Stock template is overridden by settings ({}); nothing to refresh",
                        dir.display()
                    );
                }

                let cache_dir = settings
                    .resolved_cache_dir()
                    .context("Failed to resolve cache directory")?;
                let root = StockAssets::unpack_root(&cache_dir);
                StockAssets::unpack(&root, true)
                    .with_context(|| format!("Failed to unpack stock template into {}", root.display()))?;

                println!(
                    "{} {}",
                    style("✓ Stock template refreshed:").green().bold(),
                    style(root.display()).cyan()
                );
            }
        }

        Ok(())
    }
}
