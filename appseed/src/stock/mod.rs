//! Stock hello-world template
//!
//! The stock package is embedded in the binary and unpacked on first use into
//! `<cache_dir>/stock/<version>/`. It serves two purposes: it is the template
//! used when none is requested, and it supplies `www/`, `hooks/` and
//! `config.xml` to projects whose template omits them.

pub mod files;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CreateSettings;
use crate::error::{CreateError, Result};
use crate::events::NoopSink;
use crate::paths;
use crate::template::{resolve_content_root, AcquiredContent};

pub use files::STOCK_FILES;

/// Written last; its presence means the unpacked tree is complete
const COMPLETE_MARKER: &str = ".appseed-complete";

/// Located stock template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAssets {
    /// Stock package directory (holds the package manifest)
    package_dir: PathBuf,
    /// Content root of the stock package (holds `www/`, `hooks/`, ...)
    asset_dir: PathBuf,
}

impl StockAssets {
    /// Locate the stock template, unpacking the embedded copy if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be resolved or written,
    /// or the configured stock package has no usable content root.
    pub fn prepare(settings: &CreateSettings) -> Result<Self> {
        let package_dir = match &settings.stock_template {
            Some(dir) => paths::absolutize(dir)?,
            None => {
                let root = Self::unpack_root(&settings.resolved_cache_dir()?);
                Self::unpack(&root, false)?;
                root
            }
        };

        Self::at(package_dir)
    }

    /// Use an already materialized stock package at `package_dir`
    ///
    /// # Errors
    ///
    /// Returns an error if the package has no usable content root.
    pub fn at(package_dir: PathBuf) -> Result<Self> {
        let acquired = AcquiredContent {
            path: package_dir,
            scratch: false,
        };
        let content = resolve_content_root(&acquired, &NoopSink)?;

        Ok(Self {
            package_dir: acquired.path,
            asset_dir: content.path,
        })
    }

    /// Directory the embedded package is unpacked into under `cache_dir`
    #[must_use]
    pub fn unpack_root(cache_dir: &Path) -> PathBuf {
        cache_dir.join("stock").join(env!("CARGO_PKG_VERSION"))
    }

    /// Write the embedded stock files into `root`
    ///
    /// An existing complete tree is left alone unless `force` is set; an
    /// incomplete one is discarded and rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be written.
    pub fn unpack(root: &Path, force: bool) -> Result<()> {
        if !force && root.join(COMPLETE_MARKER).is_file() {
            return Ok(());
        }

        if root.exists() {
            fs::remove_dir_all(root)
                .map_err(|e| CreateError::io("Failed to clear stock directory", root, e))?;
        }

        for (relative, content) in STOCK_FILES {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| CreateError::io("Failed to create directory", parent, e))?;
            }
            fs::write(&path, content)
                .map_err(|e| CreateError::io("Failed to write stock file", &path, e))?;
        }

        let marker = root.join(COMPLETE_MARKER);
        fs::write(&marker, env!("CARGO_PKG_VERSION"))
            .map_err(|e| CreateError::io("Failed to write stock file", &marker, e))?;

        tracing::debug!(path = %root.display(), "unpacked stock template");
        Ok(())
    }

    /// Stock package directory, used as the default template
    #[must_use]
    pub fn package_dir(&self) -> &Path {
        &self.package_dir
    }

    /// Stock content root
    #[must_use]
    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Path of one stock asset, e.g. `www` or `config.xml`
    #[must_use]
    pub fn asset(&self, name: &str) -> PathBuf {
        self.asset_dir.join(name)
    }
}
