use std::io;

/// Errors surfaced to callers of the three public operations.
///
/// Kept as a named-variant enum (rather than a boxed `dyn Error`) because
/// callers are expected to `match` on the kind: a `TimedOut` is routine
/// contention a caller may retry with backoff, `AlreadyLocked` is caller
/// misuse, and `Io` is everything else.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// The exclusive gate could not be acquired within `timeout_sec` because
    /// `lockfile` persisted for the whole spin.
    #[error("timed out after {0}s waiting for the lock gate")]
    TimedOut(u64),

    /// The calling process already holds or has requested an incompatible
    /// lock, or (on release) has no outstanding lock at all.
    #[error("process already holds an incompatible lock, or has none to release")]
    AlreadyLocked,

    /// Any other filesystem error, annotated with the OS cause.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LockError>;
