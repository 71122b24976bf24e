//! Path helpers: absolutizing, containment checks and XDG base directories
//!
//! Base directories follow the XDG specification:
//! - Config: `$XDG_CONFIG_HOME/appseed/` (user settings)
//! - Cache: `$XDG_CACHE_HOME/appseed/` (unpacked stock assets)

use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use crate::error::{CreateError, Result};

/// Application directory name under the XDG base directories
pub const APP_DIR: &str = "appseed";

/// Resolve `path` against the current directory and normalize `.`/`..` lexically
///
/// The path does not need to exist.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    path.absolutize()
        .map(|p| p.into_owned())
        .map_err(|e| CreateError::io("Failed to resolve path", path, e))
}

/// True when `child` is `parent` or lies beneath it
///
/// Both paths are absolutized first; a path that cannot be resolved is
/// never considered inside anything.
#[must_use]
pub fn is_inside(child: &Path, parent: &Path) -> bool {
    match (absolutize(child), absolutize(parent)) {
        (Ok(child), Ok(parent)) => child.starts_with(parent),
        _ => false,
    }
}

/// True when `path` exists and is a symbolic link (dangling links included)
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|meta| meta.file_type().is_symlink())
}

/// True when anything, including a dangling symlink, occupies `path`
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Resolve the XDG config directory for appseed
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> Result<PathBuf> {
    let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else {
        dirs::home_dir()
            .ok_or_else(|| CreateError::Config("could not determine home directory".to_string()))?
            .join(".config")
    };

    Ok(base.join(APP_DIR))
}

/// Resolve the XDG cache directory for appseed
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn cache_dir() -> Result<PathBuf> {
    let base = if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg)
    } else {
        dirs::home_dir()
            .ok_or_else(|| CreateError::Config("could not determine home directory".to_string()))?
            .join(".cache")
    };

    Ok(base.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_absolutize_normalizes_dots() {
        let abs = absolutize(Path::new("/tmp/a/../b/./c")).unwrap();
        assert_eq!(abs, PathBuf::from("/tmp/b/c"));
    }

    #[test]
    fn test_absolutize_relative_uses_cwd() {
        let abs = absolutize(Path::new("some/dir")).unwrap();
        assert!(abs.is_absolute());
        assert!(abs.ends_with("some/dir"));
    }

    #[test]
    fn test_is_inside() {
        assert!(is_inside(Path::new("/tmp/tpl/dest"), Path::new("/tmp/tpl")));
        assert!(is_inside(Path::new("/tmp/tpl"), Path::new("/tmp/tpl")));
        assert!(is_inside(Path::new("/tmp/tpl/a/../dest"), Path::new("/tmp/tpl/")));
        assert!(!is_inside(Path::new("/tmp/tplx"), Path::new("/tmp/tpl")));
        assert!(!is_inside(Path::new("/tmp"), Path::new("/tmp/tpl")));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_symlink_detects_dangling_links() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(temp.path().join("missing"), &link).unwrap();

        assert!(is_symlink(&link));
        assert!(entry_exists(&link));
        assert!(!link.exists());
    }

    #[test]
    fn test_regular_file_is_not_symlink() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(!is_symlink(&file));
        assert!(!is_symlink(&temp.path().join("nothing")));
    }
}
