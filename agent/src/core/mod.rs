//! Pure, deterministic logic with no I/O.

pub mod idle;
pub mod signal;
