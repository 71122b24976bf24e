//! appseed - create mobile app projects from templates
//!
//! The creation pipeline runs strictly in order:
//!
//! 1. Classify the template reference (local path, npm package, git URL)
//! 2. Acquire the template into a local directory, fetching it if needed
//! 3. Resolve the content root inside the acquired directory
//! 4. Copy or link the content into the destination and backfill stock assets
//! 5. Stamp the app id, display name and version into the manifests
//!
//! # Example
//!
//! ```rust,no_run
//! use appseed::CreateOptions;
//!
//! # async fn example() -> appseed::Result<()> {
//! appseed::create(
//!     "/tmp/hello",
//!     CreateOptions::new().id("org.example.hello").name("Hello"),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod create;
pub mod error;
pub mod events;
pub mod fetch;
pub mod identifier;
pub mod manifest;
pub mod materialize;
pub mod observability;
pub mod paths;
pub mod scratch;
pub mod stamp;
pub mod stock;
pub mod template;

pub use config::CreateSettings;
pub use create::{create, CreateOptions, Creator, LegacyConfig};
pub use error::{CreateError, Result};
pub use events::{Channel, EventSink, NoopSink, RecordingSink, TracingSink};
pub use fetch::{FetchError, FetchOptions, NpmFetcher, TemplateFetcher};
pub use identifier::{IdentifierValidator, JavaPackageValidator};
pub use scratch::{cleanup_guard, ScratchGuard};
pub use template::{AcquiredContent, ContentKind, ContentRoot, TemplateSpec};

/// Version string forced into generated manifests unless configured otherwise
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Name of the structured config manifest at a project root
pub const CONFIG_XML: &str = "config.xml";

/// Name of the package manifest at a project root
pub const PACKAGE_JSON: &str = "package.json";
