//! Logging setup
//!
//! Installs a `tracing` subscriber for binaries built on appseed. The library
//! itself only emits through `tracing` and never installs a subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Lower the default filter to `debug`
    pub verbose: bool,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl ObservabilityConfig {
    /// Enable debug output
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable JSON output
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Filter used when `RUST_LOG` is unset
    #[must_use]
    pub const fn default_directive(&self) -> &'static str {
        if self.verbose {
            "debug,appseed=trace"
        } else {
            "info"
        }
    }
}

/// Initialize logging
///
/// `RUST_LOG` takes precedence over the configured default filter.
///
/// # Example
///
/// ```rust,no_run
/// use appseed::observability::{self, ObservabilityConfig};
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init(&ObservabilityConfig::default())?;
/// tracing::info!("ready");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &ObservabilityConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
