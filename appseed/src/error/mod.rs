//! Error types for project creation

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fetch::FetchError;

/// Result type for project creation
pub type Result<T> = std::result::Result<T, CreateError>;

/// Errors that can occur while creating a project
///
/// Every variant except [`CreateError::Io`], [`CreateError::SymlinkPermission`]
/// and [`CreateError::Manifest`] is raised before the destination is touched.
#[derive(Debug, Error)]
pub enum CreateError {
    /// Invalid request: missing destination, non-empty destination, bad app id
    #[error("{0}")]
    Validation(String),

    /// Destination lies inside the template it would be created from
    #[error("Cannot create project \"{}\" inside the template used to create it \"{}\".", dest.display(), template.display())]
    Conflict {
        /// Requested destination
        dest: PathBuf,
        /// Template source path containing it
        template: PathBuf,
    },

    /// Remote template acquisition failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Acquired content cannot be used as a template
    #[error("{0}")]
    InvalidTemplate(String),

    /// The OS refused to create a symbolic link in link mode
    #[error(
        "Permission denied while creating symlink '{}'. Symbolic links may require elevated \
         privileges or developer mode on this system; retry without --link to copy instead.",
        path.display()
    )]
    SymlinkPermission {
        /// Link that could not be created
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },

    /// A package or config manifest exists but cannot be parsed or edited
    #[error("Invalid manifest '{}': {message}", path.display())]
    Manifest {
        /// Manifest path
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure during copy, link or write
    #[error("{context} '{}': {source}", path.display())]
    Io {
        /// What was being attempted
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// The underlying IO error
        source: io::Error,
    },
}

impl CreateError {
    /// Build an [`CreateError::Io`] for `path`
    pub fn io(context: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a [`CreateError::Manifest`] for `path`
    pub fn manifest(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for CreateError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
