//! Debug-logging shim: peripheral glue, gated behind an environment
//! variable, that traces gate contention, retries, and GC decisions. It
//! never participates in the protocol's correctness.
//!
//! Mirrors the teacher's `DEBUG_MODE` process-wide flag, but as a plain
//! synchronous check-then-print instead of a channel-backed async logger —
//! there is no executor here whose blocking we need to avoid.

use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

static DEBUG_MODE: LazyLock<bool> = LazyLock::new(|| {
    matches!(
        std::env::var("NFS_RWLOCK_DEBUG").as_deref(),
        Ok("1") | Ok("true")
    )
});

pub(crate) fn is_enabled() -> bool {
    *DEBUG_MODE
}

pub(crate) fn timestamp_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

macro_rules! debug_log {
    ($($arg:tt)*) => {
        if $crate::debug::is_enabled() {
            eprintln!("[nfs-rwlock {}] {}", $crate::debug::timestamp_secs(), format!($($arg)*));
        }
    };
}
pub(crate) use debug_log;
