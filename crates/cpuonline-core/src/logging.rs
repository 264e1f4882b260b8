//! Logging powered by tracing-subscriber.
//!
//! Events go to stderr so that stdout carries only the status report.

use tracing_subscriber::EnvFilter;

/// Builds the filter from a level or a full directive list
/// (`info`, `cpuonline_core=debug,warn`, ...).
pub fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", level, e))
}

/// Installs the global subscriber. A subscriber that is already installed is
/// left in place.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = build_env_filter(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .ok();
    Ok(())
}
