//! Request engine: under a held gate and a freshly loaded state, mutates
//! the decoded entries to request, upgrade-to-granted, or remove the
//! current process's entry, enforcing the reader/writer admissibility
//! policy.

use crate::error::{LockError, Result};
use crate::identity::Identity;
use crate::state::{ClientState, Mode, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Granted,
    Pending,
}

fn granted_entry(entries: &[ClientState]) -> Option<&ClientState> {
    entries.iter().find(|e| e.status == Status::Granted)
}

fn admissible(entries: &[ClientState], mode: Mode) -> bool {
    match granted_entry(entries) {
        None => true,
        Some(g) => mode == Mode::Read && g.mode == Mode::Read,
    }
}

/// Returns the outcome and whether `entries` was mutated (and so needs a
/// `dump`, on top of whatever dirtiness `load` already reported).
pub(crate) fn request(
    entries: &mut Vec<ClientState>,
    identity: &Identity,
    mode: Mode,
    now: i64,
) -> Result<(Outcome, bool)> {
    let is_admissible = admissible(entries, mode);

    let existing_idx = entries
        .iter()
        .position(|e| e.host == identity.host && e.pid == identity.pid);

    match existing_idx {
        Some(idx) => {
            let entry = &mut entries[idx];
            if entry.status == Status::Granted || entry.mode != mode {
                return Err(LockError::AlreadyLocked);
            }
            // PENDING with matching mode.
            if is_admissible {
                entry.status = Status::Granted;
                entry.time = now;
                Ok((Outcome::Granted, true))
            } else if entry.time != now {
                entry.time = now;
                Ok((Outcome::Pending, true))
            } else {
                Ok((Outcome::Pending, false))
            }
        }
        None => {
            let status = if is_admissible {
                Status::Granted
            } else {
                Status::Pending
            };
            entries.push(ClientState {
                host: identity.host.clone(),
                pid: identity.pid.clone(),
                mode,
                status,
                time: now,
            });
            let outcome = if is_admissible {
                Outcome::Granted
            } else {
                Outcome::Pending
            };
            Ok((outcome, true))
        }
    }
}

/// Removes the calling process's entry. Always dumps on success, even if
/// the only prior change was a stale-entry GC during load — the caller is
/// responsible for that unconditional dump, matching §4.4.
pub(crate) fn remove(entries: &mut Vec<ClientState>, identity: &Identity) -> Result<()> {
    let idx = entries
        .iter()
        .position(|e| e.host == identity.host && e.pid == identity.pid)
        .ok_or(LockError::AlreadyLocked)?;
    entries.remove(idx);
    Ok(())
}
