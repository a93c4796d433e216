//! The polling loop: watcher, executor, handoff publisher, idle governor.

use std::path::Path;
use std::thread;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::AgentConfig;
use crate::core::idle::IdleState;
use crate::core::signal::{Signal, classify};
use crate::io::executor::StepExecutor;
use crate::io::scan::list_entries;
use crate::io::sync::Syncer;
use crate::step::{StepOutcome, StepResult, run_step};

/// Reason why `run_loop` stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStop {
    /// An exit sentinel appeared in the working directory.
    ExitSentinel { sentinel: String },
    /// A step script exited nonzero (or timed out). Fail-fast: the agent
    /// does not retry or skip.
    StepFailed {
        script: String,
        exit_code: Option<i32>,
    },
    /// The idle threshold elapsed before any script was ever executed.
    IdleTimeout { idle_cycles: u32 },
}

/// Summary of a loop invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    /// Scripts detected and executed over the loop's lifetime.
    pub executions: u32,
    pub stop: LoopStop,
}

/// Poll `workdir` until an exit sentinel appears, a step script fails, or
/// the idle window elapses with zero executions.
///
/// Each cycle scans the directory once. An exit sentinel wins over pending
/// scripts. A detected script is processed strictly sequentially: the next
/// cycle does not begin until its log is written and its handoff published.
/// Every cycle ends with an unconditional sleep of the configured poll
/// interval; the idle counter advances after that sleep. `on_step` is
/// invoked after each completed script.
///
/// This stops immediately on any filesystem error on the core path; a
/// half-completed handoff is unsafe to continue from.
pub fn run_loop<E: StepExecutor, S: Syncer, F: FnMut(&StepOutcome)>(
    workdir: &Path,
    executor: &E,
    syncer: &S,
    config: &AgentConfig,
    mut on_step: F,
) -> Result<LoopOutcome> {
    info!(workdir = %workdir.display(), "starting waiting loop");
    let mut state = IdleState::new();

    loop {
        let entries = list_entries(workdir)?;
        let signal = classify(&entries);
        let was_idle = matches!(signal, Signal::Idle);

        match signal {
            Signal::Exit(sentinel) => {
                info!(sentinel = %sentinel, "exit sentinel found, exiting waiting loop");
                return Ok(LoopOutcome {
                    executions: state.executions,
                    stop: LoopStop::ExitSentinel { sentinel },
                });
            }
            Signal::Step(script) => {
                // Counters move the moment a script is detected, before its
                // outcome is known.
                state.record_script();
                match run_step(workdir, executor, syncer, config, &script)? {
                    StepResult::Completed(outcome) => on_step(&outcome),
                    StepResult::Failed {
                        script, exit_code, ..
                    } => {
                        return Ok(LoopOutcome {
                            executions: state.executions,
                            stop: LoopStop::StepFailed { script, exit_code },
                        });
                    }
                }
            }
            Signal::Idle => {}
        }

        thread::sleep(config.poll_interval());

        if was_idle && state.record_idle(config.idle_timeout_cycles) {
            warn!(
                idle_cycles = state.idle_cycles,
                "no executions within the idle window, exiting with error"
            );
            return Ok(LoopOutcome {
                executions: state.executions,
                stop: LoopStop::IdleTimeout {
                    idle_cycles: state.idle_cycles,
                },
            });
        }
    }
}
