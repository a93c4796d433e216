//! Startup snapshot of the process environment.
//!
//! Written once at startup so the orchestrator side can inspect the
//! scheduler-provided environment (allocation variables, module paths) the
//! agent ran under.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Write the full process environment to `path` as pretty-printed JSON with
/// sorted keys. Variables with non-UTF-8 names or values are skipped.
pub fn write_env_snapshot(path: &Path) -> Result<()> {
    let vars: BTreeMap<String, String> = env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect();
    let mut buf = serde_json::to_string_pretty(&vars).context("serialize environment")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write env snapshot {}", path.display()))?;
    Ok(())
}
