//! A multi-reader / single-writer advisory lock shared across processes on
//! different hosts that communicate only through a common POSIX-compliant
//! network filesystem (e.g. NFS).
//!
//! Mutual exclusion over a shared state file is bootstrapped from one
//! filesystem primitive that fails atomically even on NFS — hard-link
//! creation — and the reader/writer fairness policy is encoded entirely in
//! that state file, with bounded tolerance of crashed clients via
//! staleness GC. See `SPEC_FULL.md` in the repository root for the full
//! design.
//!
//! The library is synchronous and single-threaded per process: it is not
//! re-entrant, and callers must serialize their own calls. Concurrency is
//! across processes, coordinated exclusively through `lockdir`.
//!
//! ```no_run
//! use nfs_rwlock::{acquire_read, release, LockConfig};
//!
//! let cfg = LockConfig::new("/mnt/shared/my-lock", 10_000, 30);
//! acquire_read(&cfg).expect("acquire_read");
//! // ... critical section ...
//! release(&cfg).expect("release");
//! ```

mod config;
mod debug;
mod driver;
mod engine;
mod error;
mod gate;
mod identity;
mod paths;
mod state;

pub use config::LockConfig;
pub use driver::{acquire_read, acquire_write, release};
pub use error::{LockError, Result};
pub use identity::{set_hostname, set_pid};
