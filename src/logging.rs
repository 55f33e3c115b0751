//! Console logging for the preparation pipeline.
//!
//! Lines are timestamped, leveled and human-readable, written to stdout.
//! The default level is `info`; set `RUST_LOG` to override it.
//!
//! ## Usage
//!
//! ```no_run
//! use acis_prep::logging;
//!
//! // Initialize once at startup
//! logging::init().expect("Failed to initialize logging");
//!
//! tracing::info!("Pipeline started");
//! tracing::warn!("All date parsing failed");
//! ```

use anyhow::{Context as _, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Initializes the global subscriber with a single stdout layer.
///
/// # Errors
///
/// Returns error if the filter cannot be built or a global subscriber is
/// already installed.
pub fn init() -> Result<()> {
    // Default to INFO, allow override with RUST_LOG
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized");

    Ok(())
}
