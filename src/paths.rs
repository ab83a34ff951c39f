//! Path composer: the three well-known filenames under `lockdir`, derived
//! from the configured directory and the calling process's identity.
//!
//! These are cheap to build from scratch, so unlike the original C source's
//! module-level path buffers, this rewrite never caches them in a mutable
//! global — every call derives a fresh `Paths` from the `LockConfig` and
//! `Identity` in hand, which is trivially correct whenever either changes.

use crate::identity::Identity;
use std::path::PathBuf;

pub(crate) const STATE_FILE_NAME: &str = "state";
pub(crate) const LOCKFILE_NAME: &str = "lockfile";

#[derive(Debug, Clone)]
pub(crate) struct Paths {
    pub state: PathBuf,
    pub lockfile: PathBuf,
    pub private: PathBuf,
}

impl Paths {
    pub fn new(lockdir: &std::path::Path, identity: &Identity) -> Self {
        Self {
            state: lockdir.join(STATE_FILE_NAME),
            lockfile: lockdir.join(LOCKFILE_NAME),
            private: lockdir.join(format!("{}.{}", identity.host, identity.pid)),
        }
    }
}
