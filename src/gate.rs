//! Exclusive-gate: bounded-wait exclusive ownership of the state file,
//! bootstrapped from the one filesystem primitive that fails atomically on
//! conflict even over NFS — hard-link creation.
//!
//! `open(O_EXCL)` is not reliable across all NFS implementations, which is
//! why this gate is built on `link(existing, new)` instead: the OS
//! guarantees at most one caller wins the race to create `lockfile`.

use crate::debug::debug_log;
use crate::error::{LockError, Result};
use crate::paths::Paths;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::thread;
use std::time::{Duration, Instant};

#[cfg(unix)]
fn create_private_marker(path: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o666)
        .open(path)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_private_marker(path: &std::path::Path) -> std::io::Result<()> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(())
}

/// Acquire exclusive ownership of the state file. On success, the caller
/// must eventually call [`unlock`] — nothing else releases the gate short
/// of the process dying.
pub(crate) fn lock(paths: &Paths, spin_usec: u64, timeout_sec: u64) -> Result<()> {
    create_private_marker(&paths.private)?;

    let start = Instant::now();
    let budget = Duration::from_secs(timeout_sec);
    loop {
        match fs::hard_link(&paths.private, &paths.lockfile) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if start.elapsed() >= budget {
                    debug_log!("gate acquisition timed out after {:?}", start.elapsed());
                    return Err(LockError::TimedOut(timeout_sec));
                }
                thread::sleep(Duration::from_micros(spin_usec));
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Release the gate. Both `lockfile` and the private marker are removed
/// even if one removal fails; if both fail, the `lockfile` removal's error
/// takes precedence, mirroring the driver's own first-error-wins policy.
pub(crate) fn unlock(paths: &Paths) -> Result<()> {
    let lockfile_result = fs::remove_file(&paths.lockfile);
    let private_result = fs::remove_file(&paths.private);
    lockfile_result?;
    private_result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use tempfile::TempDir;

    fn paths_for(dir: &TempDir, pid: &str) -> Paths {
        Paths::new(
            dir.path(),
            &Identity {
                host: "h".into(),
                pid: pid.into(),
            },
        )
    }

    #[test]
    fn lock_then_unlock_round_trips() {
        let dir = TempDir::new().unwrap();
        let paths = paths_for(&dir, "1");
        lock(&paths, 1_000, 5).unwrap();
        assert!(paths.lockfile.exists());
        unlock(&paths).unwrap();
        assert!(!paths.lockfile.exists());
        assert!(!paths.private.exists());
    }

    #[test]
    fn second_locker_times_out_while_first_holds_gate() {
        let dir = TempDir::new().unwrap();
        let paths_a = paths_for(&dir, "1");
        let paths_b = paths_for(&dir, "2");

        lock(&paths_a, 1_000, 1).unwrap();

        let start = Instant::now();
        let result = lock(&paths_b, 1_000, 1);
        assert!(matches!(result, Err(LockError::TimedOut(1))));
        assert!(start.elapsed() >= Duration::from_secs(1));

        unlock(&paths_a).unwrap();
    }

    #[test]
    fn abandoned_lockfile_causes_timeout() {
        let dir = TempDir::new().unwrap();
        let paths = paths_for(&dir, "1");
        // Simulate an out-of-band lockfile with no live holder: create any
        // file at the lockfile path directly.
        fs::write(&paths.lockfile, b"").unwrap();

        let result = lock(&paths, 1_000, 1);
        assert!(matches!(result, Err(LockError::TimedOut(1))));
    }

    #[test]
    fn repeated_lock_by_same_process_overwrites_marker() {
        let dir = TempDir::new().unwrap();
        let paths = paths_for(&dir, "1");
        lock(&paths, 1_000, 5).unwrap();
        unlock(&paths).unwrap();
        // Should be able to lock again without issue.
        lock(&paths, 1_000, 5).unwrap();
        unlock(&paths).unwrap();
    }
}
