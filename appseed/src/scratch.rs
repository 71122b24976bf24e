//! Scratch directories for fetched templates
//!
//! A fetched template has to stay on disk for the rest of the process:
//! link-mode projects point into it. Directories are therefore registered
//! with a process-wide [`ScratchRegistry`] instead of being tied to the value
//! that created them, and removed in one go at shutdown.
//!
//! Binaries hold a [`ScratchGuard`] for the lifetime of `main`:
//!
//! ```rust,no_run
//! # async fn run() {}
//! # #[tokio::main]
//! # async fn main() {
//! let _scratch = appseed::scratch::cleanup_guard();
//! run().await;
//! // fetched templates are removed here
//! # }
//! ```
//!
//! Without a guard the directories are left in the system temp directory.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{CreateError, Result};

static GLOBAL: ScratchRegistry = ScratchRegistry::new();

/// Tracks scratch directories until they are cleaned up
#[derive(Debug)]
pub struct ScratchRegistry {
    dirs: Mutex<Vec<PathBuf>>,
}

impl Default for ScratchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchRegistry {
    /// Empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dirs: parking_lot::const_mutex(Vec::new()),
        }
    }

    /// Registry shared by the whole process
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Create and register a new directory named `<prefix><random>`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(&self, prefix: &str) -> Result<PathBuf> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .map_err(|e| {
                CreateError::io("Failed to create scratch directory", std::env::temp_dir(), e)
            })?;
        let path = dir.keep();
        self.dirs.lock().push(path.clone());
        tracing::trace!(path = %path.display(), "registered scratch directory");
        Ok(path)
    }

    /// Remove one registered directory right away
    ///
    /// Only for directories nothing can point into yet, such as the target of
    /// a failed fetch. Unknown paths are ignored.
    pub fn discard(&self, path: &Path) {
        let known = {
            let mut dirs = self.dirs.lock();
            let before = dirs.len();
            dirs.retain(|dir| dir != path);
            dirs.len() != before
        };
        if known {
            remove(path);
        }
    }

    /// True if `path` is a registered directory
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.dirs.lock().iter().any(|dir| dir == path)
    }

    /// Number of registered directories
    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.lock().len()
    }

    /// True if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.lock().is_empty()
    }

    /// Remove every registered directory and return how many there were
    ///
    /// Removal failures are logged, never raised.
    pub fn cleanup(&self) -> usize {
        let dirs = std::mem::take(&mut *self.dirs.lock());
        for dir in &dirs {
            remove(dir);
        }
        dirs.len()
    }
}

fn remove(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => tracing::trace!(path = %path.display(), "removed scratch directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove scratch directory");
        }
    }
}

/// Cleans up the global registry when dropped
#[derive(Debug)]
#[must_use = "scratch directories are removed when the guard is dropped"]
pub struct ScratchGuard {
    _private: (),
}

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        let removed = ScratchRegistry::global().cleanup();
        if removed > 0 {
            tracing::debug!(removed, "cleaned up scratch directories");
        }
    }
}

/// Guard that removes every fetched template when it goes out of scope
pub const fn cleanup_guard() -> ScratchGuard {
    ScratchGuard { _private: () }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_directories_survive_until_cleanup() {
        let registry = ScratchRegistry::new();
        let first = registry.create("appseed-scratch-test-").unwrap();
        let second = registry.create("appseed-scratch-test-").unwrap();

        assert!(first.is_dir() && second.is_dir());
        assert!(first
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("appseed-scratch-test-"));
        assert!(registry.contains(&first));
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.cleanup(), 2);
        assert!(!first.exists() && !second.exists());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_discard_removes_only_that_directory() {
        let registry = ScratchRegistry::new();
        let kept = registry.create("appseed-scratch-test-").unwrap();
        let dropped = registry.create("appseed-scratch-test-").unwrap();

        registry.discard(&dropped);
        assert!(!dropped.exists());
        assert!(kept.is_dir());
        assert!(!registry.contains(&dropped));

        registry.cleanup();
        assert!(!kept.exists());
    }

    #[test]
    fn test_discard_ignores_unregistered_paths() {
        let registry = ScratchRegistry::new();
        let outside = tempfile::TempDir::new().unwrap();
        registry.discard(outside.path());
        assert!(outside.path().is_dir());
    }

    #[test]
    fn test_cleanup_tolerates_already_removed_directories() {
        let registry = ScratchRegistry::new();
        let dir = registry.create("appseed-scratch-test-").unwrap();
        fs::remove_dir_all(&dir).unwrap();
        assert_eq!(registry.cleanup(), 1);
    }
}
