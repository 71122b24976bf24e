//! Template acquisition
//!
//! Turns a [`TemplateSpec`] into a directory on local disk. Remote templates
//! are fetched into directories of the process-wide
//! [`ScratchRegistry`](crate::scratch::ScratchRegistry), so they outlive the
//! acquirer and any project linking into them keeps working.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{with_latest_tag, AcquiredContent, ReferenceKind, TemplateSpec};
use crate::error::{CreateError, Result};
use crate::events::EventSink;
use crate::fetch::{FetchOptions, TemplateFetcher};
use crate::paths;
use crate::scratch::ScratchRegistry;

/// Produces local template directories from template specs
pub struct Acquirer {
    fetcher: Arc<dyn TemplateFetcher>,
    stock_package: PathBuf,
    scratch_prefix: String,
}

impl std::fmt::Debug for Acquirer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Acquirer")
            .field("stock_package", &self.stock_package)
            .field("scratch_prefix", &self.scratch_prefix)
            .finish_non_exhaustive()
    }
}

impl Acquirer {
    /// Create an acquirer
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Collaborator used for remote references
    /// * `stock_package` - Directory of the bundled stock template package
    /// * `scratch_prefix` - Prefix for scratch directory names
    pub fn new(
        fetcher: Arc<dyn TemplateFetcher>,
        stock_package: PathBuf,
        scratch_prefix: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            stock_package,
            scratch_prefix: scratch_prefix.into(),
        }
    }

    /// Replace the fetch collaborator
    pub fn set_fetcher(&mut self, fetcher: Arc<dyn TemplateFetcher>) {
        self.fetcher = fetcher;
    }

    /// Acquire the template described by `spec`
    ///
    /// Local paths are only absolutized; whether they exist is checked later
    /// when the content root is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::Fetch`] when a remote fetch fails, or
    /// [`CreateError::Io`] when no scratch directory can be created.
    pub async fn acquire(
        &self,
        spec: &TemplateSpec,
        events: &dyn EventSink,
    ) -> Result<AcquiredContent> {
        if spec.is_default {
            tracing::debug!(path = %self.stock_package.display(), "using stock template");
            return Ok(AcquiredContent {
                path: self.stock_package.clone(),
                scratch: false,
            });
        }

        let kind = ReferenceKind::classify(&spec.reference);
        if kind.is_remote() {
            let target = with_latest_tag(&spec.reference);
            let registry = ScratchRegistry::global();
            let scratch = registry.create(&self.scratch_prefix)?;
            events.verbose(&format!("Fetching template {target}"));
            tracing::debug!(?kind, %target, scratch = %scratch.display(), "fetching template");

            let path = match self
                .fetcher
                .fetch(&target, &scratch, &FetchOptions::default())
                .await
            {
                Ok(path) => path,
                Err(e) => {
                    registry.discard(&scratch);
                    return Err(CreateError::Fetch(e));
                }
            };
            return Ok(AcquiredContent {
                path,
                scratch: true,
            });
        }

        let path = paths::absolutize(Path::new(&spec.reference))?;
        tracing::debug!(path = %path.display(), "using local template");
        Ok(AcquiredContent {
            path,
            scratch: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Channel, NoopSink, RecordingSink};
    use crate::fetch::FetchError;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::{always, eq};

    mock! {
        Fetcher {}

        #[async_trait]
        impl TemplateFetcher for Fetcher {
            async fn fetch(
                &self,
                reference: &str,
                dest: &Path,
                options: &FetchOptions,
            ) -> std::result::Result<PathBuf, FetchError>;
        }
    }

    fn acquirer(fetcher: MockFetcher) -> Acquirer {
        Acquirer::new(Arc::new(fetcher), PathBuf::from("/stock/pkg"), "appseed-test-")
    }

    #[tokio::test]
    async fn test_default_template_uses_stock_package() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().never();

        let acquired = acquirer(fetcher)
            .acquire(&TemplateSpec::stock(Path::new("/ignored")), &NoopSink)
            .await
            .unwrap();
        assert_eq!(acquired.path, PathBuf::from("/stock/pkg"));
        assert!(!acquired.scratch);
    }

    #[tokio::test]
    async fn test_local_template_is_absolutized_without_fetch() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().never();

        // `..` needs a real directory to step out of
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::create_dir(temp.path().join("tpl")).unwrap();
        let reference = format!("{}/sub/../tpl", temp.path().display());
        let acquired = acquirer(fetcher)
            .acquire(&TemplateSpec::explicit(reference), &NoopSink)
            .await
            .unwrap();
        assert_eq!(acquired.path, temp.path().join("tpl"));
        assert!(!acquired.scratch);
    }

    #[tokio::test]
    async fn test_bare_package_name_is_fetched_as_latest() {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .with(eq("my-remote-template@latest"), always(), always())
            .times(1)
            .returning(|_, dest, _| Ok(dest.join("node_modules").join("my-remote-template")));

        let events = RecordingSink::new();
        let acquirer = acquirer(fetcher);
        let acquired = acquirer
            .acquire(&TemplateSpec::explicit("my-remote-template"), &events)
            .await
            .unwrap();

        assert!(acquired.scratch);
        assert!(acquired.path.ends_with("node_modules/my-remote-template"));
        let scratch = acquired.path.parent().and_then(Path::parent).unwrap();
        assert!(ScratchRegistry::global().contains(scratch));
        assert!(events.contains(Channel::Verbose, "my-remote-template@latest"));
        ScratchRegistry::global().discard(scratch);
    }

    #[tokio::test]
    async fn test_scratch_dir_uses_prefix_and_exists_during_fetch() {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(1).returning(|_, dest, _| {
            assert!(dest.is_dir());
            let name = dest.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("appseed-test-"));
            Ok(dest.to_path_buf())
        });

        let acquirer = acquirer(fetcher);
        let acquired = acquirer
            .acquire(&TemplateSpec::explicit("pkg@1.0.0"), &NoopSink)
            .await
            .unwrap();

        // Scratch content outlives the acquirer
        drop(acquirer);
        assert!(acquired.path.is_dir());
        assert!(ScratchRegistry::global().contains(&acquired.path));
        ScratchRegistry::global().discard(&acquired.path);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced_unchanged() {
        let seen = Arc::new(parking_lot::Mutex::new(None::<PathBuf>));
        let recorded = Arc::clone(&seen);
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(1).returning(move |_, dest, _| {
            *recorded.lock() = Some(dest.to_path_buf());
            Err(FetchError::Other("Fetch fail".to_string()))
        });

        let err = acquirer(fetcher)
            .acquire(
                &TemplateSpec::explicit("http://localhost:1234/template"),
                &NoopSink,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CreateError::Fetch(FetchError::Other(ref m)) if m == "Fetch fail"));

        // Nothing can link into a failed fetch, so its scratch dir goes at once
        let scratch = seen.lock().clone().unwrap();
        assert!(!scratch.exists());
        assert!(!ScratchRegistry::global().contains(&scratch));
    }
}
