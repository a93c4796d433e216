//! Signal classification over a working-directory listing.
//!
//! The orchestrator communicates through file names alone: an exit sentinel
//! terminates the agent, a step script is one unit of work. Classification
//! is pure so the loop's control decisions can be tested without a
//! filesystem.

/// Suffix of the exit sentinel dropped by the orchestrator.
pub const EXIT_SUFFIX: &str = ".gitlab_ci_exit";
/// Suffix of a step script dropped by the orchestrator.
pub const STEP_SUFFIX: &str = ".gitlab_ci_step_script";
/// Suffix appended to a script name for its captured-output log.
pub const LOG_SUFFIX: &str = ".log";
/// Suffix appended to a script name for its completion marker.
pub const EXECUTED_SUFFIX: &str = ".executed";

/// Control signal found in one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// An exit sentinel is present; terminate cleanly.
    Exit(String),
    /// A step script is pending; execute it.
    Step(String),
    /// Neither signal found this cycle.
    Idle,
}

/// Classify a directory listing into at most one control signal.
///
/// The exit sentinel always wins, even when step scripts are also pending.
/// Among multiple pending step scripts the lexicographically smallest name
/// is selected, so selection is deterministic regardless of filesystem
/// listing order; the rest stay untouched for later cycles.
pub fn classify(entries: &[String]) -> Signal {
    if let Some(sentinel) = entries.iter().find(|name| name.ends_with(EXIT_SUFFIX)) {
        return Signal::Exit(sentinel.clone());
    }
    if let Some(script) = entries
        .iter()
        .filter(|name| name.ends_with(STEP_SUFFIX))
        .min()
    {
        return Signal::Step(script.clone());
    }
    Signal::Idle
}

/// Log file name for a step script.
pub fn log_name(script: &str) -> String {
    format!("{script}{LOG_SUFFIX}")
}

/// Completion marker name for a step script.
pub fn executed_name(script: &str) -> String {
    format!("{script}{EXECUTED_SUFFIX}")
}
