//! Project manifests: `package.json` and `config.xml`
//!
//! Both are always read fresh from disk; nothing is cached between calls.

pub mod config_xml;
pub mod package;

pub use config_xml::ConfigManifest;
pub use package::PackageManifest;
