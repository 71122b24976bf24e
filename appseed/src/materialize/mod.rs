//! Materialization of template content into the project directory
//!
//! Content is either copied (the default) or symlinked (link mode). Either
//! way, `www/`, `hooks/` and `config.xml` are backfilled from the stock
//! template when the result lacks them, and empty `platforms/` and
//! `plugins/` directories are created.

pub mod link;

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CreateError, Result};
use crate::events::EventSink;
use crate::paths::entry_exists;
use crate::stock::StockAssets;
use crate::template::ContentRoot;
use crate::CONFIG_XML;

use link::{LinkError, LinkKind};

/// Housekeeping entries never copied from a flat template
pub const EXCLUDED_ENTRIES: &[&str] = &[
    "package.json",
    "RELEASENOTES.md",
    ".git",
    "NOTICE",
    "LICENSE",
    "COPYRIGHT",
    ".npmignore",
];

/// Directories linked from the template in link mode
pub const LINKED_DIRS: &[&str] = &["www", "merges", "hooks"];

/// Entries supplied from the stock template when missing
pub const BACKFILLED_ENTRIES: &[&str] = &["www", "hooks", CONFIG_XML];

/// Directories every project gets, empty
pub const PROJECT_DIRS: &[&str] = &["platforms", "plugins"];

/// Creates the destination and removes it again unless committed
///
/// A destination that already existed is never removed.
#[derive(Debug)]
pub struct DestinationGuard {
    path: PathBuf,
    existed: bool,
    armed: bool,
}

impl DestinationGuard {
    /// Create `path` if needed, remembering whether it was already there
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        let existed = path.exists();
        if !existed {
            fs::create_dir_all(path)
                .map_err(|e| CreateError::io("Failed to create directory", path, e))?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            existed,
            armed: true,
        })
    }

    /// True if the destination existed before this guard was created
    #[must_use]
    pub const fn existed(&self) -> bool {
        self.existed
    }

    /// Keep the destination
    pub fn commit(mut self) {
        self.armed = false;
    }
}

impl Drop for DestinationGuard {
    fn drop(&mut self) {
        if self.armed && !self.existed {
            tracing::debug!(path = %self.path.display(), "rolling back partially created project");
            // The error that triggered the rollback is what the caller sees.
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

/// Copies or links a content root into a project directory
pub struct Materializer<'a> {
    stock: &'a StockAssets,
    events: &'a dyn EventSink,
}

impl<'a> Materializer<'a> {
    /// Create a materializer backed by `stock` for missing assets
    pub fn new(stock: &'a StockAssets, events: &'a dyn EventSink) -> Self {
        Self { stock, events }
    }

    /// Populate `dest` from `root`
    ///
    /// `dest` must already exist; see [`DestinationGuard`].
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::SymlinkPermission`] if link mode is refused by
    /// the OS, [`CreateError::Io`] for any other filesystem failure.
    pub fn materialize(&self, root: &ContentRoot, dest: &Path, link: bool) -> Result<()> {
        if link {
            self.events.verbose("Linking assets.");
            Self::link_from_template(root, dest)?;
        } else {
            self.events.verbose("Copying assets.");
            Self::copy_template_files(root, dest)?;
            promote_www_manifest(dest)?;
            rename_gitignore_files(dest)?;
        }

        self.backfill(dest)?;

        for dir in PROJECT_DIRS {
            let path = dest.join(dir);
            fs::create_dir_all(&path)
                .map_err(|e| CreateError::io("Failed to create directory", &path, e))?;
        }

        Ok(())
    }

    fn copy_template_files(root: &ContentRoot, dest: &Path) -> Result<()> {
        if root.is_www() {
            return copy_recursive(&root.path, &dest.join("www"));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&root.path)
            .map_err(|e| CreateError::io("Failed to read directory", &root.path, e))?
        {
            let entry =
                entry.map_err(|e| CreateError::io("Failed to read directory", &root.path, e))?;
            names.push(entry.file_name());
        }
        names.sort();

        for name in names {
            let excluded = EXCLUDED_ENTRIES.iter().any(|ex| name == *ex);
            if excluded && root.applies_exclusions() {
                tracing::trace!(entry = ?name, "skipping housekeeping entry");
                continue;
            }
            copy_recursive(&root.path.join(&name), &dest.join(&name))?;
        }

        Ok(())
    }

    fn link_from_template(root: &ContentRoot, dest: &Path) -> Result<()> {
        let manifest_copy_source = if root.is_www() {
            relink(&root.path, &dest.join("www"), LinkKind::Dir)?;
            root.path.parent().map(|parent| parent.join(CONFIG_XML))
        } else {
            for dir in LINKED_DIRS {
                relink(&root.path.join(dir), &dest.join(dir), LinkKind::Dir)?;
            }
            relink(&root.path.join(CONFIG_XML), &dest.join(CONFIG_XML), LinkKind::File)?;
            Some(root.path.join("www").join(CONFIG_XML))
        };

        let manifest = dest.join(CONFIG_XML);
        if let Some(source) = manifest_copy_source {
            if !entry_exists(&manifest) && source.is_file() {
                fs::copy(&source, &manifest)
                    .map_err(|e| CreateError::io("Failed to copy", &source, e))?;
            }
        }

        Ok(())
    }

    fn backfill(&self, dest: &Path) -> Result<()> {
        for name in BACKFILLED_ENTRIES {
            let target = dest.join(name);
            if target.exists() {
                continue;
            }

            let source = self.stock.asset(name);
            if !entry_exists(&source) {
                continue;
            }

            // A dangling link counts as missing
            remove_entry(&target)?;
            tracing::debug!(entry = name, "using stock asset");
            copy_recursive(&source, &target)?;
        }

        Ok(())
    }
}

/// Move a copied `www/config.xml` to the project root if the root has none
fn promote_www_manifest(dest: &Path) -> Result<()> {
    let manifest = dest.join(CONFIG_XML);
    let nested = dest.join("www").join(CONFIG_XML);
    if entry_exists(&manifest) || !nested.is_file() {
        return Ok(());
    }

    tracing::debug!(from = %nested.display(), "using manifest found in www");
    fs::rename(&nested, &manifest).map_err(|e| CreateError::io("Failed to rename", &nested, e))
}

/// Replace whatever is at `dst` with a link to `src`, if `src` exists
fn relink(src: &Path, dst: &Path, kind: LinkKind) -> Result<()> {
    remove_entry(dst)?;
    if !src.exists() {
        return Ok(());
    }

    link::symlink(src, dst, kind).map_err(|err| link_failure(dst, err))
}

/// Translate a failed link at `dst` into the error callers see
fn link_failure(dst: &Path, err: LinkError) -> CreateError {
    match err {
        LinkError::PermissionDenied(source) => CreateError::SymlinkPermission {
            path: dst.to_path_buf(),
            source,
        },
        LinkError::Other(source) => CreateError::io("Failed to create symlink", dst, source),
    }
}

/// Remove a file, directory or link at `path`; absent paths are fine
fn remove_entry(path: &Path) -> Result<()> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| CreateError::io("Failed to remove", path, e))
}

/// Copy a file, link or directory tree from `src` to `dst`
///
/// Links are recreated as links rather than followed. Existing files at the
/// destination are overwritten.
///
/// # Errors
///
/// Returns an error if anything cannot be read or written.
pub fn copy_recursive(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            CreateError::io("Failed to read", path, e.into())
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = if relative.as_os_str().is_empty() {
            dst.to_path_buf()
        } else {
            dst.join(relative)
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| CreateError::io("Failed to create directory", &target, e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| CreateError::io("Failed to create directory", parent, e))?;
            }
            if file_type.is_symlink() {
                copy_link(entry.path(), &target)?;
            } else {
                fs::copy(entry.path(), &target)
                    .map_err(|e| CreateError::io("Failed to copy", entry.path(), e))?;
            }
        }
    }

    Ok(())
}

fn copy_link(src: &Path, dst: &Path) -> Result<()> {
    let target =
        fs::read_link(src).map_err(|e| CreateError::io("Failed to read link", src, e))?;
    remove_entry(dst)?;
    let kind = if src.is_dir() { LinkKind::Dir } else { LinkKind::File };

    link::symlink(&target, dst, kind).map_err(|err| match err {
        LinkError::PermissionDenied(source) | LinkError::Other(source) => {
            CreateError::io("Failed to copy link", src, source)
        }
    })
}

/// Rename every regular file called `gitignore` under `dir` to `.gitignore`
///
/// Packages published to npm cannot carry `.gitignore`, so templates ship it
/// without the dot. Directories with that name are left alone, and linked
/// directories are not descended into.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be renamed.
pub fn rename_gitignore_files(dir: &Path) -> Result<()> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            CreateError::io("Failed to read", path, e.into())
        })?;
        if entry.file_type().is_file() && entry.file_name() == "gitignore" {
            found.push(entry.into_path());
        }
    }

    for path in found {
        let renamed = path.with_file_name(".gitignore");
        fs::rename(&path, &renamed).map_err(|e| CreateError::io("Failed to rename", &path, e))?;
    }

    Ok(())
}
