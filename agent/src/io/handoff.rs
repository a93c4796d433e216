//! Handoff publishing: makes a completed script observable to a remote
//! filesystem poller.
//!
//! The script's content is copied into `<script>.executed` rather than
//! renamed, so the destination path only ever appears with its full content
//! even on filesystems where a rename's visibility is not atomic across
//! hosts. Ordering is fixed: write returns, then the source is removed, then
//! sync hints are issued, then the directory is touched. At every observable
//! instant after this function returns, exactly one of {original script,
//! completed file} exists with full content.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::signal::executed_name;
use crate::io::sync::Syncer;

/// Publish the handoff for a successfully executed script.
///
/// Returns the path of the completion marker.
pub fn publish<S: Syncer>(workdir: &Path, script: &str, syncer: &S) -> Result<PathBuf> {
    let source = workdir.join(script);
    let executed = workdir.join(executed_name(script));

    let content =
        fs::read(&source).with_context(|| format!("read script {}", source.display()))?;
    fs::write(&executed, &content)
        .with_context(|| format!("write completion marker {}", executed.display()))?;
    fs::remove_file(&source)
        .with_context(|| format!("remove script {}", source.display()))?;

    syncer.sync_file(&executed);
    syncer.sync_fs();
    syncer.sync_all();
    syncer.touch_dir(workdir);

    debug!(script, executed = %executed.display(), "handoff published");
    Ok(executed)
}
