//! `package.json` access

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{CreateError, Result};

/// A `package.json` file read fresh from disk
///
/// Key order is preserved on write.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Read and parse `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CreateError::io("Failed to read manifest", path, e))?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| CreateError::manifest(path, e.to_string()))?;

        match value {
            Value::Object(fields) => Ok(Self {
                path: path.to_path_buf(),
                fields,
            }),
            _ => Err(CreateError::manifest(path, "expected a JSON object")),
        }
    }

    /// Package name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.string_field("name")
    }

    /// Human readable name
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.string_field("displayName")
    }

    /// Package version
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.string_field("version")
    }

    /// Package author, when given as a plain string
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.string_field("author")
    }

    /// Set the package name
    pub fn set_name(&mut self, name: &str) {
        self.fields.insert("name".to_string(), Value::from(name));
    }

    /// Set the human readable name
    pub fn set_display_name(&mut self, name: &str) {
        self.fields.insert("displayName".to_string(), Value::from(name));
    }

    /// Set the package version
    pub fn set_version(&mut self, version: &str) {
        self.fields.insert("version".to_string(), Value::from(version));
    }

    /// Write back to the file it was read from, indented by four spaces
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> Result<()> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        serde::Serialize::serialize(&self.fields, &mut serializer)
            .map_err(|e| CreateError::manifest(&self.path, e.to_string()))?;
        out.push(b'\n');

        fs::write(&self.path, out)
            .map_err(|e| CreateError::io("Failed to write manifest", &self.path, e))
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_edit_preserves_order_and_other_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(
            &path,
            r#"{"name":"old","version":"0.0.1","scripts":{"test":"x"},"author":"Someone"}"#,
        )
        .unwrap();

        let mut pkg = PackageManifest::read(&path).unwrap();
        pkg.set_name("org.testing");
        pkg.set_display_name("TestBase");
        pkg.set_version("1.0.0");
        pkg.write().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n    \"name\": \"org.testing\""));
        assert!(written.contains("\n        \"test\": \"x\""));

        let reread = PackageManifest::read(&path).unwrap();
        assert_eq!(reread.name(), Some("org.testing"));
        assert_eq!(reread.display_name(), Some("TestBase"));
        assert_eq!(reread.version(), Some("1.0.0"));
        assert_eq!(reread.author(), Some("Someone"));
        let keys: Vec<&String> = reread.fields.keys().collect();
        assert_eq!(keys, ["name", "version", "scripts", "author", "displayName"]);
    }

    #[test]
    fn test_non_object_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = PackageManifest::read(&path).unwrap_err();
        assert!(matches!(err, CreateError::Manifest { .. }));
    }
}
