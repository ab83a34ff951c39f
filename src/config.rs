use std::path::{Path, PathBuf};

/// Configuration passed by the caller on every call.
///
/// `lockdir` is owned by the caller: it must already exist and be
/// readable/writable by this process. `spin_usec` and `timeout_sec` must be
/// positive; the protocol's retry and staleness bounds are meaningless
/// otherwise.
#[derive(Debug, Clone)]
pub struct LockConfig {
    pub lockdir: PathBuf,
    pub spin_usec: u64,
    pub timeout_sec: u64,
}

impl LockConfig {
    pub fn new(lockdir: impl AsRef<Path>, spin_usec: u64, timeout_sec: u64) -> Self {
        debug_assert!(spin_usec > 0, "spin_usec must be positive, got 0");
        debug_assert!(timeout_sec > 0, "timeout_sec must be positive, got 0");
        Self {
            lockdir: lockdir.as_ref().to_path_buf(),
            spin_usec,
            timeout_sec,
        }
    }
}
