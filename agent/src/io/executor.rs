//! Executor abstraction for step-script invocation.
//!
//! The [`StepExecutor`] trait decouples the polling loop from subprocess
//! spawning. Tests use scripted executors that return predetermined outputs
//! without spawning processes.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::io::process::run_command;

/// Parameters for one step-script invocation.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Working directory the script runs in (unchanged from the agent's).
    pub workdir: PathBuf,
    /// Script file name within `workdir`.
    pub script: String,
    /// Optional execution timeout. `None` waits unbounded, matching the
    /// original behavior where a hanging script hangs the agent.
    pub timeout: Option<Duration>,
}

/// Captured result of one step-script invocation.
#[derive(Debug, Clone)]
pub struct StepOutput {
    /// True when the script exited with status zero (and did not time out).
    pub success: bool,
    /// Exit code if the script exited normally.
    pub exit_code: Option<i32>,
    /// Captured standard output as text.
    pub stdout: String,
    /// Captured standard error as text.
    pub stderr: String,
    /// True when the optional execution timeout expired.
    pub timed_out: bool,
}

/// Abstraction over step-script execution backends.
pub trait StepExecutor {
    /// Run the script described by `request` and capture its output.
    fn run(&self, request: &ExecRequest) -> Result<StepOutput>;
}

/// Executor that invokes the script through `bash`.
pub struct BashExecutor;

impl StepExecutor for BashExecutor {
    #[instrument(skip_all, fields(script = %request.script))]
    fn run(&self, request: &ExecRequest) -> Result<StepOutput> {
        info!(workdir = %request.workdir.display(), "invoking step script");

        let mut cmd = Command::new("bash");
        cmd.arg(&request.script).current_dir(&request.workdir);
        let output = run_command(cmd, request.timeout)
            .with_context(|| format!("run bash {}", request.script))?;

        let success = output.status.success() && !output.timed_out;
        debug!(success, exit_code = ?output.status.code(), "step script finished");
        Ok(StepOutput {
            success,
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            timed_out: output.timed_out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn bash_executor_runs_script_in_workdir() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("probe.sh"), "pwd; echo done").expect("write script");

        let output = BashExecutor
            .run(&ExecRequest {
                workdir: temp.path().to_path_buf(),
                script: "probe.sh".to_string(),
                timeout: None,
            })
            .expect("run");

        assert!(output.success);
        assert!(output.stdout.ends_with("done\n"));
        // pwd must report the working directory, canonicalized or not.
        let cwd_line = output.stdout.lines().next().expect("pwd line");
        let reported = fs::canonicalize(cwd_line).expect("canonicalize reported");
        let expected = fs::canonicalize(temp.path()).expect("canonicalize workdir");
        assert_eq!(reported, expected);
    }

    #[test]
    fn bash_executor_reports_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("fail.sh"), "echo broken >&2; exit 7").expect("write script");

        let output = BashExecutor
            .run(&ExecRequest {
                workdir: temp.path().to_path_buf(),
                script: "fail.sh".to_string(),
                timeout: None,
            })
            .expect("run");

        assert!(!output.success);
        assert_eq!(output.exit_code, Some(7));
        assert_eq!(output.stderr, "broken\n");
    }
}
