//! Template references and their classification
//!
//! A template reference is a local path, a URL, or an npm package spec
//! (`name`, `name@version`, `@scope/name@version`). Classification is a pure
//! function of the reference and the current filesystem state.

pub mod acquire;
pub mod layout;

use std::path::{Path, PathBuf};

pub use acquire::Acquirer;
pub use layout::resolve_content_root;

/// Where project content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    /// Local path, URL, or `name[@version]` package spec
    pub reference: String,

    /// True only when no template was requested and the stock package is used
    pub is_default: bool,
}

impl TemplateSpec {
    /// Template requested explicitly by the caller
    pub fn explicit(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            is_default: false,
        }
    }

    /// The bundled stock template located at `path`
    #[must_use]
    pub fn stock(path: &Path) -> Self {
        Self {
            reference: path.display().to_string(),
            is_default: true,
        }
    }
}

/// How a reference will be acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// A URL with a real protocol scheme (git, https, ...)
    Url,
    /// An npm package spec that is not a local path
    Package {
        /// The spec pins a version, tag or range (`name@x`)
        versioned: bool,
    },
    /// An existing local path
    LocalPath,
}

impl ReferenceKind {
    /// Classify `reference` against the current filesystem
    #[must_use]
    pub fn classify(reference: &str) -> Self {
        if is_url(reference) {
            return Self::Url;
        }

        let exists = Path::new(reference).exists();
        if reference.contains('@') && !exists {
            return Self::Package {
                versioned: has_version(reference),
            };
        }

        if exists {
            Self::LocalPath
        } else {
            Self::Package { versioned: false }
        }
    }

    /// True unless the reference is an existing local path
    #[must_use]
    pub const fn is_remote(self) -> bool {
        !matches!(self, Self::LocalPath)
    }
}

/// True if `reference` must be fetched rather than read from local disk
#[must_use]
pub fn needs_remote_fetch(reference: &str) -> bool {
    ReferenceKind::classify(reference).is_remote()
}

/// A single-letter scheme is a Windows drive prefix (`C:\...`), not a URL
fn is_url(reference: &str) -> bool {
    url::Url::parse(reference).is_ok_and(|url| url.scheme().len() > 1)
}

/// `name@x` or `@scope/name@x`; the scope marker alone is not a version
fn has_version(reference: &str) -> bool {
    reference
        .strip_prefix('@')
        .unwrap_or(reference)
        .contains('@')
}

/// Pin a bare registry package name to `latest`
///
/// Without an explicit tag npm may satisfy the install from a cached older
/// version. Specs that already carry a version, and git shorthands such as
/// `user/repo` or `github:user/repo`, are returned unchanged.
#[must_use]
pub fn with_latest_tag(reference: &str) -> String {
    let kind = ReferenceKind::classify(reference);
    let is_bare_name = matches!(kind, ReferenceKind::Package { versioned: false })
        && !reference.contains(':')
        && !reference.contains('#')
        && !reference.ends_with(".git")
        && (reference.starts_with('@') || !reference.contains('/'));

    if is_bare_name {
        format!("{reference}@latest")
    } else {
        reference.to_string()
    }
}

/// Template content available on local disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredContent {
    /// Directory holding the template
    pub path: PathBuf,

    /// The directory is a scratch location that is removed later
    pub scratch: bool,
}

/// Shape of the directory chosen as content root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A bare `www` asset folder
    Www,
    /// A curated sub-directory named by the template's manifest
    SubDirectory,
    /// The acquired directory itself, housekeeping files included
    Flat,
}

/// Directory whose contents are copied or linked into the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRoot {
    /// Content directory
    pub path: PathBuf,

    /// How the directory is interpreted
    pub kind: ContentKind,
}

impl ContentRoot {
    /// True for a bare `www` folder
    #[must_use]
    pub fn is_www(&self) -> bool {
        self.kind == ContentKind::Www
    }

    /// True when housekeeping files must be filtered out while copying
    #[must_use]
    pub fn applies_exclusions(&self) -> bool {
        self.kind == ContentKind::Flat
    }
}
