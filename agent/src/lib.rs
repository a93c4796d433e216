//! Single-node execution agent for filesystem-mediated CI steps.
//!
//! The agent runs inside a batch-scheduler allocation and bridges it with a
//! CI orchestrator that cannot reach the node directly. The orchestrator
//! drops step-script files into a shared working directory; the agent polls
//! that directory, executes each script, captures its output to a per-script
//! log, and publishes completion as a `.executed` copy of the script so a
//! remote poller can observe it over a caching network filesystem.
//!
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (signal classification, idle
//!   accounting). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (directory scanning, subprocess
//!   execution, handoff publishing, sync hints). Isolated to enable mocking
//!   in tests.
//!
//! Orchestration modules ([`step`], [`looping`]) coordinate core logic with
//! I/O to implement the polling loop.

pub mod config;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod looping;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
