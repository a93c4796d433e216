//! Test-only helpers: scripted executor, recording syncer, fast config.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::config::AgentConfig;
use crate::io::executor::{ExecRequest, StepExecutor, StepOutput};
use crate::io::sync::Syncer;

/// Config with zero delays so loop tests run in microseconds. Defaults
/// elsewhere match production.
pub fn fast_config() -> AgentConfig {
    AgentConfig {
        poll_interval_ms: 0,
        settle_delay_ms: 0,
        ..AgentConfig::default()
    }
}

/// A successful step output with the given captured streams.
pub fn ok_output(stdout: &str, stderr: &str) -> StepOutput {
    StepOutput {
        success: true,
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        timed_out: false,
    }
}

/// A failed step output with the given exit code and stderr.
pub fn failed_output(exit_code: Option<i32>, stderr: &str) -> StepOutput {
    StepOutput {
        success: false,
        exit_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
        timed_out: false,
    }
}

/// Executor that returns queued outputs in order and records every request.
pub struct ScriptedExecutor {
    outputs: Mutex<Vec<StepOutput>>,
    requests: Mutex<Vec<ExecRequest>>,
}

impl ScriptedExecutor {
    pub fn new(outputs: Vec<StepOutput>) -> Self {
        let mut queue = outputs;
        queue.reverse();
        Self {
            outputs: Mutex::new(queue),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in execution order.
    pub fn requests(&self) -> Vec<ExecRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl StepExecutor for ScriptedExecutor {
    fn run(&self, request: &ExecRequest) -> Result<StepOutput> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.outputs
            .lock()
            .expect("outputs lock")
            .pop()
            .ok_or_else(|| anyhow!("no scripted output left for {}", request.script))
    }
}

/// Syncer that records call order instead of spawning sync utilities.
pub struct RecordingSyncer {
    calls: Mutex<Vec<String>>,
}

impl RecordingSyncer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl Default for RecordingSyncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Syncer for RecordingSyncer {
    fn sync_file(&self, path: &Path) {
        self.record(format!("sync_file {}", path.display()));
    }

    fn sync_fs(&self) {
        self.record("sync_fs".to_string());
    }

    fn sync_all(&self) {
        self.record("sync_all".to_string());
    }

    fn touch_dir(&self, dir: &Path) {
        self.record(format!("touch_dir {}", dir.display()));
    }
}
