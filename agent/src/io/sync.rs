//! Best-effort filesystem visibility nudges for the handoff.
//!
//! On caching network filesystems (NFS) a remote poller may not observe a
//! freshly written file for a while. The [`Syncer`] trait covers the sync
//! hints and the directory touch issued after a handoff; every call is
//! best-effort and must never block or fail the handoff itself.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Filesystem-visibility hints issued after a completed handoff.
pub trait Syncer {
    /// Targeted sync hint on one file (`sync -f <path>`). Not all sync
    /// utilities support this; failure is tolerated silently.
    fn sync_file(&self, path: &Path);
    /// General sync hint on the calling filesystem (`sync -f`).
    fn sync_fs(&self);
    /// Unconditional full filesystem sync (`sync`).
    fn sync_all(&self);
    /// Update the directory's access/modification timestamps. Defeats
    /// directory-listing caches keyed on mtime, so a remote listing picks
    /// up the handoff promptly.
    fn touch_dir(&self, dir: &Path);
}

/// Real syncer that spawns the `sync` and `touch` utilities.
pub struct CommandSyncer;

impl Syncer for CommandSyncer {
    fn sync_file(&self, path: &Path) {
        run_best_effort(Command::new("sync").arg("-f").arg(path), "sync -f <file>");
    }

    fn sync_fs(&self) {
        run_best_effort(Command::new("sync").arg("-f"), "sync -f");
    }

    fn sync_all(&self) {
        run_best_effort(&mut Command::new("sync"), "sync");
    }

    fn touch_dir(&self, dir: &Path) {
        run_best_effort(Command::new("touch").arg(dir), "touch <dir>");
    }
}

fn run_best_effort(cmd: &mut Command, label: &str) {
    let result = cmd.stdout(Stdio::null()).stderr(Stdio::null()).status();
    match result {
        Ok(status) if status.success() => {}
        Ok(status) => debug!(label, exit_code = ?status.code(), "sync hint exited nonzero"),
        Err(err) => debug!(label, err = %err, "sync hint failed to spawn"),
    }
}
