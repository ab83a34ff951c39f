//! Process identity: the `(host, pid)` pair that names this process's entry
//! in the state file.
//!
//! Defaults come from the OS (hostname, process id); both can be overridden
//! process-wide for testing via [`set_hostname`] and [`set_pid`]. Overrides
//! replace whatever was set before. This is the only mutable global state in
//! the crate, and per §5 of the design it is only ever touched from one
//! thread at a time — callers that exercise overrides across threads must
//! serialize their own access, same as every other entry point here.

use std::sync::Mutex;

fn normalize(raw: &str) -> String {
    raw.replace(' ', "_")
}

static HOST_OVERRIDE: Mutex<Option<String>> = Mutex::new(None);
static PID_OVERRIDE: Mutex<Option<String>> = Mutex::new(None);

/// Replace the default identity's host component. Ignored if `host` is empty.
pub fn set_hostname(host: impl Into<String>) {
    let host = host.into();
    if host.is_empty() {
        return;
    }
    *HOST_OVERRIDE.lock().unwrap() = Some(normalize(&host));
}

/// Replace the default identity's pid component. Ignored if `pid` is empty.
pub fn set_pid(pid: impl Into<String>) {
    let pid = pid.into();
    if pid.is_empty() {
        return;
    }
    *PID_OVERRIDE.lock().unwrap() = Some(normalize(&pid));
}

fn os_hostname() -> String {
    // gethostname(2) via libc, matching the POSIX primitives the rest of the
    // gate is built on. 256 bytes comfortably covers HOST_NAME_MAX on Linux.
    let mut buf = vec![0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc != 0 {
        return "localhost".to_string();
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// This process's current `(host, pid)` identity, with overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub host: String,
    pub pid: String,
}

impl Identity {
    pub fn current() -> Self {
        let host = HOST_OVERRIDE
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| normalize(&os_hostname()));
        let pid = PID_OVERRIDE
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| std::process::id().to_string());
        Self { host, pid }
    }
}
