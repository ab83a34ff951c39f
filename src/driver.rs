//! Spin driver: the three public operations, each composing gate, state
//! codec, and request engine into lock → load → mutate → dump → unlock,
//! retrying outside the gate on `PENDING` so waiters never starve peers.

use crate::config::LockConfig;
use crate::debug::debug_log;
use crate::engine::{self, Outcome};
use crate::error::Result;
use crate::gate;
use crate::identity::Identity;
use crate::paths::Paths;
use crate::state::{self, Mode};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Runs `body` under a held gate, always attempting to release the gate
/// afterwards regardless of `body`'s outcome. If both fail, `body`'s error
/// takes precedence, matching §7's "first error wins" policy.
fn under_gate<T>(
    cfg: &LockConfig,
    paths: &Paths,
    body: impl FnOnce() -> Result<T>,
) -> Result<T> {
    gate::lock(paths, cfg.spin_usec, cfg.timeout_sec)?;
    let result = body();
    let unlock_result = gate::unlock(paths);
    match result {
        Err(e) => Err(e),
        Ok(value) => unlock_result.map(|()| value),
    }
}

fn acquire(cfg: &LockConfig, mode: Mode) -> Result<()> {
    loop {
        let identity = Identity::current();
        let paths = Paths::new(&cfg.lockdir, &identity);

        let outcome = under_gate(cfg, &paths, || {
            let now = now_secs();
            let mut loaded = state::load(&paths, cfg.timeout_sec, now)?;
            let (outcome, mutated) = engine::request(&mut loaded.entries, &identity, mode, now)?;
            if loaded.dirty || mutated {
                state::dump(&paths, &loaded.entries)?;
            }
            Ok(outcome)
        })?;

        match outcome {
            Outcome::Granted => return Ok(()),
            Outcome::Pending => {
                debug_log!("{:?} pending for {}.{}, retrying", mode, identity.host, identity.pid);
                thread::sleep(Duration::from_micros(cfg.spin_usec));
            }
        }
    }
}

/// Acquire the lock in read mode. Blocks (retrying indefinitely) until
/// granted or a non-`PENDING` failure occurs.
pub fn acquire_read(cfg: &LockConfig) -> Result<()> {
    acquire(cfg, Mode::Read)
}

/// Acquire the lock in write mode. Blocks (retrying indefinitely) until
/// granted or a non-`PENDING` failure occurs.
pub fn acquire_write(cfg: &LockConfig) -> Result<()> {
    acquire(cfg, Mode::Write)
}

/// Release whatever lock this process currently holds. Mode-agnostic:
/// `(host, pid)` alone identifies the entry to remove, so there is no
/// separate read-release / write-release path (see DESIGN.md on the
/// original's release-path bug).
pub fn release(cfg: &LockConfig) -> Result<()> {
    let identity = Identity::current();
    let paths = Paths::new(&cfg.lockdir, &identity);

    under_gate(cfg, &paths, || {
        let now = now_secs();
        let mut loaded = state::load(&paths, cfg.timeout_sec, now)?;
        engine::remove(&mut loaded.entries, &identity)?;
        state::dump(&paths, &loaded.entries)
    })
}
