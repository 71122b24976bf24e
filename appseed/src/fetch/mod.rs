//! Remote template retrieval
//!
//! The pipeline only depends on [`TemplateFetcher`]; [`NpmFetcher`] is the
//! default implementation and delegates to `npm install`, which understands
//! registry names, versioned specs and git URLs alike.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Errors raised by a fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetch command could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// Program that was invoked
        command: String,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// The fetch command exited unsuccessfully
    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The fetch reported success but the package cannot be located
    #[error("fetched package not found in {}", .0.display())]
    PackageNotFound(PathBuf),

    /// Filesystem failure while preparing or inspecting the fetch directory
    #[error("fetch IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure
    #[error("{0}")]
    Other(String),
}

/// Options passed through to the fetcher
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Skip development dependencies of the fetched package
    pub production: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { production: true }
    }
}

/// Retrieves a remote template into a local directory
#[async_trait]
pub trait TemplateFetcher: Send + Sync {
    /// Fetch `reference` into `dest` and return the path of the retrieved content
    async fn fetch(
        &self,
        reference: &str,
        dest: &Path,
        options: &FetchOptions,
    ) -> Result<PathBuf, FetchError>;
}

/// Fetcher backed by `npm install`
#[derive(Debug, Clone)]
pub struct NpmFetcher {
    npm: String,
}

impl Default for NpmFetcher {
    fn default() -> Self {
        Self::new("npm")
    }
}

impl NpmFetcher {
    /// Create a fetcher that runs the given npm executable
    pub fn new(npm: impl Into<String>) -> Self {
        Self { npm: npm.into() }
    }

    fn install_args(reference: &str, dest: &Path, options: &FetchOptions) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            reference.to_string(),
            "--save".to_string(),
            "--no-package-lock".to_string(),
            "--no-audit".to_string(),
            "--no-fund".to_string(),
            "--prefix".to_string(),
            dest.display().to_string(),
        ];
        if options.production {
            args.push("--omit=dev".to_string());
        }
        args
    }

    /// Locate the single dependency npm recorded in `dest/package.json`
    fn installed_package(dest: &Path) -> Result<PathBuf, FetchError> {
        let manifest = dest.join("package.json");
        let content = std::fs::read_to_string(&manifest)?;
        let json: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| FetchError::Other(format!("invalid {}: {e}", manifest.display())))?;

        let name = json
            .get("dependencies")
            .and_then(serde_json::Value::as_object)
            .and_then(|deps| deps.keys().next())
            .ok_or_else(|| FetchError::PackageNotFound(dest.to_path_buf()))?;

        let package_dir = dest.join("node_modules").join(name);
        if package_dir.is_dir() {
            Ok(package_dir)
        } else {
            Err(FetchError::PackageNotFound(package_dir))
        }
    }
}

#[async_trait]
impl TemplateFetcher for NpmFetcher {
    async fn fetch(
        &self,
        reference: &str,
        dest: &Path,
        options: &FetchOptions,
    ) -> Result<PathBuf, FetchError> {
        tokio::fs::create_dir_all(dest).await?;

        // npm records the resolved package name here, which is how a git URL
        // is mapped back to its node_modules directory.
        let manifest = dest.join("package.json");
        if !manifest.exists() {
            tokio::fs::write(&manifest, "{\n    \"private\": true\n}\n").await?;
        }

        let args = Self::install_args(reference, dest, options);
        let command_line = format!("{} {}", self.npm, args.join(" "));
        tracing::debug!(command = %command_line, "fetching template");

        let output = Command::new(&self.npm)
            .args(&args)
            .current_dir(dest)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| FetchError::Spawn {
                command: self.npm.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let package_dir = Self::installed_package(dest)?;
        tracing::debug!(path = %package_dir.display(), "template fetched");
        Ok(package_dir)
    }
}
