//! Agent configuration.
//!
//! All knobs default to the fixed constants the orchestrator protocol was
//! calibrated against; a missing config file yields exactly those defaults.
//! The file suffixes are protocol constants, not configuration (see
//! [`crate::core::signal`]).

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Agent configuration (TOML).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentConfig {
    /// Unconditional sleep at the end of every polling cycle, in
    /// milliseconds. The idle threshold is measured in cycles of this
    /// length.
    pub poll_interval_ms: u64,

    /// Delay before executing a freshly detected script, in milliseconds.
    /// Lets the writer's filesystem operation settle: on networked
    /// filesystems the file's metadata can be visible before its content is
    /// fully flushed.
    pub settle_delay_ms: u64,

    /// Idle cycles tolerated before a never-used allocation exits with
    /// failure. Counted in cycles, not wall-clock seconds.
    pub idle_timeout_cycles: u32,

    /// Optional per-script execution timeout in seconds. `None` reproduces
    /// the original unbounded wait, where a hanging script hangs the agent.
    /// Setting this is an explicit behavior deviation; a timed-out script
    /// is treated as a failed script.
    pub step_timeout_secs: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            settle_delay_ms: 1_000,
            idle_timeout_cycles: 600,
            step_timeout_secs: None,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.idle_timeout_cycles == 0 {
            return Err(anyhow!("idle_timeout_cycles must be > 0"));
        }
        if self.step_timeout_secs == Some(0) {
            return Err(anyhow!("step_timeout_secs must be > 0 when set"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AgentConfig::default()`.
pub fn load_config(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        let cfg = AgentConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AgentConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
