//! Orchestration for one detected step script: settle, execute, log,
//! publish.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::AgentConfig;
use crate::core::signal::log_name;
use crate::io::executor::{ExecRequest, StepExecutor};
use crate::io::handoff::publish;
use crate::io::sync::Syncer;

/// A successfully executed and published step script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Script file name.
    pub script: String,
    /// Path of the captured-output log.
    pub log_path: PathBuf,
    /// Path of the completion marker.
    pub executed_path: PathBuf,
}

/// Result of processing one detected script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// Script exited zero; log written, handoff published.
    Completed(StepOutcome),
    /// Script exited nonzero or timed out; fatal to the agent, no
    /// completion marker is written.
    Failed {
        script: String,
        exit_code: Option<i32>,
        timed_out: bool,
    },
}

/// Process one detected step script end to end.
///
/// Waits the configured settle delay, executes the script, writes the log
/// (stdout block first, then stderr block, regardless of runtime
/// interleaving), and on success publishes the handoff. On failure the
/// script's stderr is appended to the log so any content already written is
/// preserved; the original script is left in place.
pub fn run_step<E: StepExecutor, S: Syncer>(
    workdir: &Path,
    executor: &E,
    syncer: &S,
    config: &AgentConfig,
    script: &str,
) -> Result<StepResult> {
    info!(script, "starting execution of step script");
    // Let the orchestrator's write settle before reading the script.
    thread::sleep(config.settle_delay());

    let output = executor.run(&ExecRequest {
        workdir: workdir.to_path_buf(),
        script: script.to_string(),
        timeout: config.step_timeout(),
    })?;

    let log_path = workdir.join(log_name(script));
    if !output.success {
        error!(
            script,
            exit_code = ?output.exit_code,
            timed_out = output.timed_out,
            "error executing step script"
        );
        append_to_log(&log_path, &output.stderr)?;
        return Ok(StepResult::Failed {
            script: script.to_string(),
            exit_code: output.exit_code,
            timed_out: output.timed_out,
        });
    }

    write_log(&log_path, &output.stdout, &output.stderr)?;
    let executed_path = publish(workdir, script, syncer)?;
    info!(script, "finished execution of step script");
    Ok(StepResult::Completed(StepOutcome {
        script: script.to_string(),
        log_path,
        executed_path,
    }))
}

/// Write a fresh log: full stdout block, then full stderr block.
fn write_log(path: &Path, stdout: &str, stderr: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("create log {}", path.display()))?;
    file.write_all(stdout.as_bytes())
        .with_context(|| format!("write stdout to {}", path.display()))?;
    file.write_all(stderr.as_bytes())
        .with_context(|| format!("write stderr to {}", path.display()))?;
    Ok(())
}

/// Append to the log without truncating, preserving any partial stdout
/// already flushed.
fn append_to_log(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("append stderr to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingSyncer, ScriptedExecutor, failed_output, fast_config, ok_output};
    use std::fs;

    #[test]
    fn success_writes_log_and_publishes() {
        let temp = tempfile::tempdir().expect("tempdir");
        let script = "a.gitlab_ci_step_script";
        fs::write(temp.path().join(script), "echo hi").expect("write script");

        let executor = ScriptedExecutor::new(vec![ok_output("hi\n", "")]);
        let syncer = RecordingSyncer::new();
        let result = run_step(temp.path(), &executor, &syncer, &fast_config(), script)
            .expect("run step");

        let StepResult::Completed(outcome) = result else {
            panic!("expected completion, got {result:?}");
        };
        assert_eq!(outcome.script, script);
        let log = fs::read_to_string(&outcome.log_path).expect("read log");
        assert_eq!(log, "hi\n");
        assert!(outcome.executed_path.exists());
        assert!(!temp.path().join(script).exists());
    }

    #[test]
    fn log_orders_stdout_block_before_stderr_block() {
        let temp = tempfile::tempdir().expect("tempdir");
        let script = "a.gitlab_ci_step_script";
        fs::write(temp.path().join(script), "interleaved").expect("write script");

        let executor = ScriptedExecutor::new(vec![ok_output("o1\no2\n", "e1\ne2\n")]);
        let syncer = RecordingSyncer::new();
        run_step(temp.path(), &executor, &syncer, &fast_config(), script).expect("run step");

        let log = fs::read_to_string(temp.path().join("a.gitlab_ci_step_script.log"))
            .expect("read log");
        assert_eq!(log, "o1\no2\ne1\ne2\n");
    }

    #[test]
    fn failure_appends_stderr_and_skips_handoff() {
        let temp = tempfile::tempdir().expect("tempdir");
        let script = "a.gitlab_ci_step_script";
        fs::write(temp.path().join(script), "exit 3").expect("write script");

        let executor = ScriptedExecutor::new(vec![failed_output(Some(3), "boom\n")]);
        let syncer = RecordingSyncer::new();
        let result = run_step(temp.path(), &executor, &syncer, &fast_config(), script)
            .expect("run step");

        assert_eq!(
            result,
            StepResult::Failed {
                script: script.to_string(),
                exit_code: Some(3),
                timed_out: false,
            }
        );
        let log = fs::read_to_string(temp.path().join("a.gitlab_ci_step_script.log"))
            .expect("read log");
        assert_eq!(log, "boom\n");
        // No handoff: script stays, marker absent, no sync hints issued.
        assert!(temp.path().join(script).exists());
        assert!(!temp.path().join("a.gitlab_ci_step_script.executed").exists());
        assert!(syncer.calls().is_empty());
    }

    #[test]
    fn failure_preserves_existing_log_content() {
        let temp = tempfile::tempdir().expect("tempdir");
        let script = "a.gitlab_ci_step_script";
        fs::write(temp.path().join(script), "exit 1").expect("write script");
        let log_path = temp.path().join("a.gitlab_ci_step_script.log");
        fs::write(&log_path, "partial stdout\n").expect("seed log");

        let executor = ScriptedExecutor::new(vec![failed_output(Some(1), "boom\n")]);
        let syncer = RecordingSyncer::new();
        run_step(temp.path(), &executor, &syncer, &fast_config(), script).expect("run step");

        let log = fs::read_to_string(&log_path).expect("read log");
        assert_eq!(log, "partial stdout\nboom\n");
    }
}
