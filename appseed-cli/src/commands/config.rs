//! Settings inspection command

use anyhow::{Context, Result};
use appseed::CreateSettings;

/// Print the effective settings
pub struct ConfigCommand;

impl ConfigCommand {
    /// Execute the command
    pub fn execute(settings: &CreateSettings) -> Result<()> {
        let rendered =
            toml::to_string_pretty(settings).context("Failed to render settings as TOML")?;
        print!("{rendered}");
        Ok(())
    }
}
