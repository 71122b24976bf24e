//! Content root resolution
//!
//! An acquired template is one of:
//! - a bare `www` folder, used as the project's `www`
//! - a package whose `package.json` names a sub-directory via `"dirname"`
//! - a flat directory whose entries are copied into the project root

use std::path::Path;

use super::{AcquiredContent, ContentKind, ContentRoot};
use crate::error::{CreateError, Result};
use crate::events::EventSink;
use crate::PACKAGE_JSON;

/// Manifest field pointing at the template's content sub-directory
pub const DIRNAME_FIELD: &str = "dirname";

/// Pick the directory whose contents make up the project
///
/// # Errors
///
/// Returns [`CreateError::InvalidTemplate`] if the template manifest cannot be
/// parsed or the chosen directory does not exist.
pub fn resolve_content_root(
    acquired: &AcquiredContent,
    events: &dyn EventSink,
) -> Result<ContentRoot> {
    let root = if acquired.path.file_name().is_some_and(|name| name == "www") {
        ContentRoot {
            path: acquired.path.clone(),
            kind: ContentKind::Www,
        }
    } else if let Some(dirname) = read_dirname_pointer(&acquired.path)? {
        ContentRoot {
            path: acquired.path.join(dirname),
            kind: ContentKind::SubDirectory,
        }
    } else {
        events.verbose(&format!(
            "{} does not declare a template sub-directory",
            acquired.path.display()
        ));
        ContentRoot {
            path: acquired.path.clone(),
            kind: ContentKind::Flat,
        }
    };

    if !root.path.exists() {
        return Err(CreateError::InvalidTemplate(format!(
            "Could not find directory: {}",
            root.path.display()
        )));
    }

    tracing::debug!(path = %root.path.display(), kind = ?root.kind, "resolved content root");
    Ok(root)
}

/// Read the `"dirname"` pointer from `dir/package.json`, if any
///
/// Always reads from disk, so edits between calls are picked up.
fn read_dirname_pointer(dir: &Path) -> Result<Option<String>> {
    let manifest = dir.join(PACKAGE_JSON);
    if !manifest.is_file() {
        return Ok(None);
    }

    let invalid = || CreateError::InvalidTemplate(format!("{} is not a valid template", dir.display()));

    let content = std::fs::read_to_string(&manifest).map_err(|_| invalid())?;
    let json: serde_json::Value = serde_json::from_str(&content).map_err(|_| invalid())?;

    Ok(json
        .get(DIRNAME_FIELD)
        .and_then(serde_json::Value::as_str)
        .filter(|dirname| !dirname.is_empty())
        .map(ToString::to_string))
}
