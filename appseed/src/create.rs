//! Project creation entry points
//!
//! [`Creator`] owns everything a creation needs (settings, stock assets, the
//! fetch collaborator and the identifier predicate) and runs the pipeline:
//! validate, acquire, resolve the content root, materialize, stamp.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::CreateSettings;
use crate::error::{CreateError, Result};
use crate::events::{EventSink, NoopSink};
use crate::fetch::{NpmFetcher, TemplateFetcher};
use crate::identifier::{IdentifierValidator, JavaPackageValidator};
use crate::materialize::{DestinationGuard, Materializer};
use crate::paths;
use crate::stamp::{Identity, IdentityStamper};
use crate::stock::StockAssets;
use crate::template::{
    resolve_content_root, Acquirer, ContentRoot, ReferenceKind, TemplateSpec,
};

/// Entry a destination may already contain and still count as empty
pub const RESERVED_SETTINGS_ENTRY: &str = ".appseed";

/// Options for one project creation
#[derive(Clone, Default)]
pub struct CreateOptions {
    /// App id, e.g. `org.example.app`
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Template reference; the stock template is used when absent
    pub template: Option<String>,
    /// Symlink template content instead of copying it
    pub link: bool,
    /// Progress sink
    pub events: Option<Arc<dyn EventSink>>,
}

impl fmt::Debug for CreateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateOptions")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("template", &self.template)
            .field("link", &self.link)
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl CreateOptions {
    /// Options with nothing set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the app id
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the display name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the template reference
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Enable or disable link mode
    #[must_use]
    pub const fn link(mut self, link: bool) -> Self {
        self.link = link;
        self
    }

    /// Set the progress sink
    #[must_use]
    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Treat empty strings as unset
    fn normalized(mut self) -> Self {
        for field in [&mut self.id, &mut self.name, &mut self.template] {
            if field.as_deref().is_some_and(str::is_empty) {
                *field = None;
            }
        }
        self
    }
}

/// Older nested configuration object, `{ "lib": { "www": { ... } } }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Library section
    pub lib: LegacyLib,
}

/// `lib` section of [`LegacyConfig`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyLib {
    /// `www` section
    pub www: LegacyWww,
}

/// `lib.www` section of [`LegacyConfig`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyWww {
    /// Template reference
    pub url: Option<String>,
    /// Older spelling of `url`
    pub uri: Option<String>,
    /// Template reference, or a flag in older configs
    pub template: Option<serde_json::Value>,
    /// Link mode
    pub link: bool,
}

impl LegacyConfig {
    /// Map the nested fields onto [`CreateOptions`]
    #[must_use]
    pub fn to_options(&self) -> CreateOptions {
        let www = &self.lib.www;
        let template = www
            .url
            .clone()
            .or_else(|| www.uri.clone())
            .or_else(|| {
                www.template
                    .as_ref()
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string)
            });

        CreateOptions {
            template,
            link: www.link,
            ..CreateOptions::default()
        }
    }
}

/// Creates projects
pub struct Creator {
    settings: CreateSettings,
    stock: StockAssets,
    acquirer: Acquirer,
    validator: Box<dyn IdentifierValidator>,
}

impl fmt::Debug for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creator")
            .field("settings", &self.settings)
            .field("stock", &self.stock)
            .field("acquirer", &self.acquirer)
            .finish_non_exhaustive()
    }
}

impl Creator {
    /// Create a creator with the default npm fetcher and id validator
    ///
    /// Unpacks the stock template into the cache directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the stock template cannot be located or unpacked.
    pub fn new(settings: CreateSettings) -> Result<Self> {
        let stock = StockAssets::prepare(&settings)?;
        let fetcher: Arc<dyn TemplateFetcher> = Arc::new(NpmFetcher::new(settings.npm.clone()));
        let acquirer = Acquirer::new(
            fetcher,
            stock.package_dir().to_path_buf(),
            settings.scratch_prefix.clone(),
        );

        Ok(Self {
            settings,
            stock,
            acquirer,
            validator: Box::new(JavaPackageValidator),
        })
    }

    /// Use `fetcher` for remote templates
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: impl TemplateFetcher + 'static) -> Self {
        self.acquirer.set_fetcher(Arc::new(fetcher));
        self
    }

    /// Use `validator` to check app ids
    #[must_use]
    pub fn with_validator(mut self, validator: impl IdentifierValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Settings in use
    #[must_use]
    pub const fn settings(&self) -> &CreateSettings {
        &self.settings
    }

    /// Stock template in use
    #[must_use]
    pub const fn stock(&self) -> &StockAssets {
        &self.stock
    }

    /// Create a project at `dest`
    ///
    /// Fetched templates stay in process-wide scratch directories until a
    /// [`ScratchGuard`](crate::ScratchGuard) is dropped, so link-mode projects
    /// remain valid after this creator is gone.
    ///
    /// # Errors
    ///
    /// - [`CreateError::Validation`] for a missing or non-empty destination or
    ///   an invalid app id
    /// - [`CreateError::Conflict`] if the destination is inside the template
    /// - [`CreateError::Fetch`] if a remote template cannot be retrieved
    /// - [`CreateError::InvalidTemplate`] if the template has no content root
    /// - [`CreateError::SymlinkPermission`], [`CreateError::Io`] or
    ///   [`CreateError::Manifest`] while populating the destination, after
    ///   which a destination created by this call is removed again
    pub async fn create(&self, dest: impl AsRef<Path>, options: CreateOptions) -> Result<()> {
        let options = options.normalized();
        let events: Arc<dyn EventSink> = options
            .events
            .clone()
            .unwrap_or_else(|| Arc::new(NoopSink));

        let dest = dest.as_ref();
        if dest.as_os_str().is_empty() {
            return Err(CreateError::Validation(
                "Directory not specified. See `appseed help`.".to_string(),
            ));
        }

        events.verbose("Using appseed create pipeline");

        let dest = paths::absolutize(dest)?;
        ensure_empty_destination(&dest)?;

        if let Some(id) = &options.id {
            if !self.validator.is_valid(id) {
                return Err(CreateError::Validation(
                    "App id contains a reserved word, or is not a valid identifier.".to_string(),
                ));
            }
        }

        let spec = match &options.template {
            Some(reference) => TemplateSpec::explicit(reference.clone()),
            None => TemplateSpec::stock(self.stock.package_dir()),
        };
        self.ensure_outside_template(&dest, &spec)?;

        events.log("Creating a new project.");
        tracing::info!(dest = %dest.display(), template = %spec.reference, link = options.link, "creating project");

        let acquired = self.acquirer.acquire(&spec, events.as_ref()).await?;
        let root = resolve_content_root(&acquired, events.as_ref())?;

        let stock = self.stock.clone();
        let settings = self.settings.clone();
        let link = options.link;
        tokio::task::spawn_blocking(move || {
            populate(&stock, &settings, &root, &dest, link, &options, events.as_ref())
        })
        .await
        .map_err(|e| {
            CreateError::io(
                "Project creation task failed",
                Path::new(""),
                std::io::Error::other(e),
            )
        })?
    }

    /// Create a project using the older positional calling convention
    ///
    /// `config.lib.www.{url|uri, template, link}` are mapped onto
    /// [`CreateOptions`]; `id`, `name` and `events` override them when given.
    ///
    /// # Errors
    ///
    /// Same as [`Creator::create`].
    pub async fn create_legacy(
        &self,
        dir: impl AsRef<Path>,
        id: Option<&str>,
        name: Option<&str>,
        config: Option<&LegacyConfig>,
        events: Option<Arc<dyn EventSink>>,
    ) -> Result<()> {
        let mut options = config.map(LegacyConfig::to_options).unwrap_or_default();

        if let Some(id) = id.filter(|id| !id.is_empty()) {
            options.id = Some(id.to_string());
        }
        if let Some(name) = name.filter(|name| !name.is_empty()) {
            options.name = Some(name.to_string());
        }
        if let Some(events) = events {
            options.events = Some(events);
        }

        self.create(dir, options).await
    }

    fn ensure_outside_template(&self, dest: &Path, spec: &TemplateSpec) -> Result<()> {
        let template = if spec.is_default {
            self.stock.package_dir().to_path_buf()
        } else if ReferenceKind::classify(&spec.reference) == ReferenceKind::LocalPath {
            paths::absolutize(Path::new(&spec.reference))?
        } else {
            return Ok(());
        };

        if paths::is_inside(dest, &template) {
            return Err(CreateError::Conflict {
                dest: dest.to_path_buf(),
                template,
            });
        }
        Ok(())
    }
}

/// Copy or link the template into `dest`, then stamp the manifests
///
/// Runs under a [`DestinationGuard`]: any failure removes a destination this
/// call created.
fn populate(
    stock: &StockAssets,
    settings: &CreateSettings,
    root: &ContentRoot,
    dest: &Path,
    link: bool,
    options: &CreateOptions,
    events: &dyn EventSink,
) -> Result<()> {
    let guard = DestinationGuard::create(dest)?;

    Materializer::new(stock, events).materialize(root, dest, link)?;

    IdentityStamper::new(
        &settings.default_version,
        &settings.fallback_package_name,
        events,
    )
    .stamp(
        dest,
        Identity {
            id: options.id.as_deref(),
            name: options.name.as_deref(),
        },
    )?;

    guard.commit();
    tracing::info!(dest = %dest.display(), "project created");
    Ok(())
}

/// Fail unless `dest` is absent, or a directory holding at most the reserved entry
fn ensure_empty_destination(dest: &Path) -> Result<()> {
    if !paths::entry_exists(dest) {
        return Ok(());
    }

    let not_empty = || {
        CreateError::Validation(format!(
            "Path already exists and is not empty: {}",
            dest.display()
        ))
    };

    if !dest.is_dir() {
        return Err(not_empty());
    }

    let entries =
        fs::read_dir(dest).map_err(|e| CreateError::io("Failed to read directory", dest, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| CreateError::io("Failed to read directory", dest, e))?;
        if entry.file_name() != RESERVED_SETTINGS_ENTRY {
            return Err(not_empty());
        }
    }

    Ok(())
}

/// Create a project at `dest` with settings loaded from the standard locations
///
/// Fetched templates are kept until the process drops its
/// [`ScratchGuard`](crate::ScratchGuard); see [`crate::scratch`].
///
/// # Errors
///
/// Same as [`Creator::create`], plus [`CreateError::Config`] when the
/// settings cannot be loaded.
pub async fn create(dest: impl AsRef<Path>, options: CreateOptions) -> Result<()> {
    let settings = CreateSettings::load()?;
    Creator::new(settings)?.create(dest, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_legacy_config_maps_url_first() {
        let cfg: LegacyConfig = serde_json::from_str(
            r#"{ "lib": { "www": { "url": "/tpl/a", "uri": "/tpl/b", "link": true } } }"#,
        )
        .unwrap();
        let options = cfg.to_options();
        assert_eq!(options.template.as_deref(), Some("/tpl/a"));
        assert!(options.link);
    }

    #[test]
    fn test_legacy_config_accepts_uri_alias() {
        let cfg: LegacyConfig =
            serde_json::from_str(r#"{ "lib": { "www": { "uri": "/tpl/b", "template": true } } }"#)
                .unwrap();
        let options = cfg.to_options();
        assert_eq!(options.template.as_deref(), Some("/tpl/b"));
        assert!(!options.link);
    }

    #[test]
    fn test_legacy_config_template_string() {
        let cfg: LegacyConfig =
            serde_json::from_str(r#"{ "lib": { "www": { "template": "my-template" } } }"#)
                .unwrap();
        assert_eq!(cfg.to_options().template.as_deref(), Some("my-template"));

        let empty: LegacyConfig = serde_json::from_str("{}").unwrap();
        assert!(empty.to_options().template.is_none());
    }

    #[test]
    fn test_options_builder_and_normalization() {
        let options = CreateOptions::new()
            .id("org.testing")
            .name("")
            .template("tpl")
            .link(true)
            .normalized();
        assert_eq!(options.id.as_deref(), Some("org.testing"));
        assert!(options.name.is_none());
        assert_eq!(options.template.as_deref(), Some("tpl"));
        assert!(options.link);
    }

    #[test]
    fn test_empty_destination_checks() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("dest");
        ensure_empty_destination(&dest).unwrap();

        fs::create_dir(&dest).unwrap();
        ensure_empty_destination(&dest).unwrap();

        fs::create_dir(dest.join(RESERVED_SETTINGS_ENTRY)).unwrap();
        ensure_empty_destination(&dest).unwrap();

        fs::write(dest.join("other"), "x").unwrap();
        let err = ensure_empty_destination(&dest).unwrap_err();
        assert!(err.to_string().contains("Path already exists and is not empty"));
    }

    #[test]
    fn test_existing_file_destination_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            ensure_empty_destination(&file),
            Err(CreateError::Validation(_))
        ));
    }
}
