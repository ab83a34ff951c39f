//! State codec: the textual `state` file describing every known lock
//! request, and the in-memory `ClientState` sequence it round-trips to.

use crate::debug::debug_log;
use crate::error::{LockError, Result};
use crate::paths::Paths;
use std::fmt;
use std::fs;
use std::io::{self, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

impl Mode {
    fn encode(self) -> char {
        match self {
            Mode::Read => 'R',
            Mode::Write => 'W',
        }
    }

    fn decode(c: &str) -> Result<Self> {
        match c {
            "R" => Ok(Mode::Read),
            "W" => Ok(Mode::Write),
            other => Err(corrupt(format!("invalid mode field {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Granted,
    Pending,
}

impl Status {
    fn encode(self) -> char {
        match self {
            Status::Granted => 'G',
            Status::Pending => 'P',
        }
    }

    fn decode(c: &str) -> Result<Self> {
        match c {
            "G" => Ok(Status::Granted),
            "P" => Ok(Status::Pending),
            other => Err(corrupt(format!("invalid status field {other:?}"))),
        }
    }
}

/// One entry in the state file: one process's desired or granted lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientState {
    pub host: String,
    pub pid: String,
    pub mode: Mode,
    pub status: Status,
    pub time: i64,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.host,
            self.pid,
            self.mode.encode(),
            self.status.encode(),
            self.time
        )
    }
}

fn corrupt(msg: String) -> LockError {
    // The state file is only ever produced by this codec; reaching this path
    // means a non-participant wrote to `lockdir`, which is out of scope
    // (see Non-goals in spec.md §1). Surfaced as `Io` since it is, in
    // effect, a malformed read of a file this process does not own.
    LockError::Io(io::Error::new(ErrorKind::InvalidData, msg))
}

/// Result of loading the state file: the live entries plus whether the
/// in-memory view already differs from what's on disk (stale-entry GC
/// happened), which forces the next `dump` rather than letting it be
/// elided.
pub(crate) struct LoadedState {
    pub entries: Vec<ClientState>,
    pub dirty: bool,
}

pub(crate) fn load(paths: &Paths, timeout_sec: u64, now: i64) -> Result<LoadedState> {
    let text = match fs::read_to_string(&paths.state) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadedState {
            entries: Vec::new(),
            dirty: false,
        }),
        Err(e) => return Err(e.into()),
    };

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() % 5 != 0 {
        return Err(corrupt(format!(
            "state file has {} tokens, not a multiple of 5",
            tokens.len()
        )));
    }

    let mut entries = Vec::with_capacity(tokens.len() / 5);
    let mut dirty = false;
    let cutoff = now - timeout_sec as i64;

    for chunk in tokens.chunks_exact(5) {
        let [host, pid, mode, status, time] = chunk else {
            unreachable!("chunks_exact(5) always yields 5 elements")
        };
        let entry = ClientState {
            host: (*host).to_string(),
            pid: (*pid).to_string(),
            mode: Mode::decode(mode)?,
            status: Status::decode(status)?,
            time: time
                .parse::<i64>()
                .map_err(|e| corrupt(format!("invalid time field {time:?}: {e}")))?,
        };
        if entry.time < cutoff {
            debug_log!("dropping stale entry {} {} (age past timeout)", entry.host, entry.pid);
            dirty = true;
            continue;
        }
        entries.push(entry);
    }

    Ok(LoadedState { entries, dirty })
}

pub(crate) fn dump(paths: &Paths, entries: &[ClientState]) -> Result<()> {
    let mut body = String::new();
    for entry in entries {
        body.push_str(&entry.to_string());
        body.push('\n');
    }
    fs::write(&paths.state, body)?;
    Ok(())
}
