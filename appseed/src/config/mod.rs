//! Configuration management for appseed
//!
//! Settings are loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `APPSEED_` prefix)
//! 2. An explicit file passed to [`CreateSettings::load_from`]
//! 3. `./appseed.toml` (project-local)
//! 4. `~/.config/appseed/config.toml` (user config, XDG)
//! 5. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.config/appseed/config.toml
//! cache_dir = "/var/cache/appseed"
//! scratch_prefix = "appseed-create-"
//! default_version = "1.0.0"
//! fallback_package_name = "helloworld"
//! npm = "npm"
//! ```
//!
//! The loaded value is handed to [`crate::Creator`] at construction; nothing
//! in the pipeline reads ambient settings afterwards.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::paths;

/// Settings for project creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSettings {
    /// Root for unpacked stock assets (defaults to the XDG cache directory)
    pub cache_dir: Option<PathBuf>,

    /// Use this stock package directory instead of the embedded one
    pub stock_template: Option<PathBuf>,

    /// Prefix for scratch directories that receive fetched templates
    pub scratch_prefix: String,

    /// Version forced into generated manifests
    pub default_version: String,

    /// `package.json` name used when no app id is given
    pub fallback_package_name: String,

    /// npm executable used by the default fetcher
    pub npm: String,
}

impl Default for CreateSettings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            stock_template: None,
            scratch_prefix: "appseed-create-".to_string(),
            default_version: crate::DEFAULT_VERSION.to_string(),
            fallback_package_name: "helloworld".to_string(),
            npm: "npm".to_string(),
        }
    }
}

impl CreateSettings {
    /// Load settings from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Ok(Self::figment(None).extract()?)
    }

    /// Load settings, layering `path` above the standard file locations
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        Ok(Self::figment(Some(path)).extract()?)
    }

    fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(dir) = paths::config_dir() {
            figment = figment.merge(Toml::file(dir.join("config.toml")));
        }

        figment = figment.merge(Toml::file("appseed.toml"));

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("APPSEED_"))
    }

    /// Directory stock assets are unpacked into
    ///
    /// # Errors
    ///
    /// Returns an error if no cache directory is configured and the home
    /// directory cannot be determined.
    pub fn resolved_cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::cache_dir(),
        }
    }

    /// Use `dir` as the cache root
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Use `dir` as the stock package instead of the embedded one
    #[must_use]
    pub fn with_stock_template(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stock_template = Some(dir.into());
        self
    }
}
