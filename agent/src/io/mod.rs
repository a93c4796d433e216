//! Side-effecting operations (filesystem, subprocesses, sync hints).

pub mod env_snapshot;
pub mod executor;
pub mod handoff;
pub mod process;
pub mod scan;
pub mod sync;
