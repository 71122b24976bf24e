//! Identity stamping
//!
//! Writes the requested app id, display name and version into the project's
//! `package.json` and `config.xml`. The two files are handled independently.

use std::path::Path;

use crate::error::Result;
use crate::events::EventSink;
use crate::manifest::{ConfigManifest, PackageManifest};
use crate::paths;
use crate::{CONFIG_XML, PACKAGE_JSON};

/// Project identity to stamp
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity<'a> {
    /// App id, e.g. `org.example.app`
    pub id: Option<&'a str>,
    /// Display name
    pub name: Option<&'a str>,
}

/// Rewrites project manifests
pub struct IdentityStamper<'a> {
    version: &'a str,
    fallback_name: &'a str,
    events: &'a dyn EventSink,
}

impl<'a> IdentityStamper<'a> {
    /// Create a stamper
    ///
    /// # Arguments
    ///
    /// * `version` - Version forced into both manifests
    /// * `fallback_name` - `package.json` name used when no id is given
    /// * `events` - Progress sink
    pub fn new(version: &'a str, fallback_name: &'a str, events: &'a dyn EventSink) -> Self {
        Self {
            version,
            fallback_name,
            events,
        }
    }

    /// Stamp `identity` into the manifests under `dest`
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest exists but cannot be parsed or written.
    pub fn stamp(&self, dest: &Path, identity: Identity<'_>) -> Result<()> {
        self.stamp_package_json(dest, identity)?;
        self.stamp_config_xml(dest, identity)
    }

    fn stamp_package_json(&self, dest: &Path, identity: Identity<'_>) -> Result<()> {
        let path = dest.join(PACKAGE_JSON);
        if !path.exists() {
            return Ok(());
        }

        let mut pkg = PackageManifest::read(&path)?;
        if let Some(name) = identity.name {
            pkg.set_display_name(name);
        }
        match identity.id {
            Some(id) => pkg.set_name(&id.to_lowercase()),
            None => pkg.set_name(self.fallback_name),
        }
        pkg.set_version(self.version);
        pkg.write()?;

        tracing::debug!(path = %path.display(), "stamped package.json");
        Ok(())
    }

    fn stamp_config_xml(&self, dest: &Path, identity: Identity<'_>) -> Result<()> {
        let path = dest.join(CONFIG_XML);
        if paths::is_symlink(&path) {
            self.events
                .verbose("Skipping config.xml update: it is a symbolic link");
            return Ok(());
        }

        let mut conf = ConfigManifest::read(&path)?;
        if let Some(id) = identity.id {
            conf.set_package_name(id)?;
        }
        if let Some(name) = identity.name {
            conf.set_name(name)?;
        }
        conf.set_version(self.version)?;
        conf.write()?;

        tracing::debug!(path = %path.display(), "stamped config.xml");
        Ok(())
    }
}
