//! Stable exit codes for the agent process.

/// Exit sentinel observed; normal shutdown.
pub const OK: i32 = 0;
/// A step script failed, or the idle timeout expired with zero executions.
pub const FAILURE: i32 = 1;
