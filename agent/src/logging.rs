//! Tracing setup for the agent's own console output.
//!
//! By default events go to stderr. On a batch node the agent usually runs
//! detached from any terminal, so [`init_file`] appends everything to a
//! single log file instead (the process-lifetime console log the
//! orchestrator side can read back).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing to stderr.
///
/// Reads `RUST_LOG`. Defaults to `info` if unset: the agent is the only
/// record of what happened on the node, so lifecycle events are on by
/// default.
pub fn init() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Initialize tracing to an append-mode file (no ANSI escapes).
pub fn init_file(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(default_filter())
        .with(
            fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .compact(),
        )
        .init();
    Ok(())
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
