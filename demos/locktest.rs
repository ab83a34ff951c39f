//! Manual multi-process test driver for the lock library.
//!
//! Peripheral glue only (see SPEC_FULL.md §13): parses a subcommand and a
//! handful of flags, applies optional identity overrides, and prints the
//! outcome. `release` is mode-agnostic, matching `engine::remove` — unlike
//! the original C test driver's `U` branch, this does not call
//! acquire-write under the hood.
//!
//! Example, run from two terminals sharing a lock directory:
//! ```text
//! locktest --lockdir /mnt/shared/lock --host h1 --pid 1 acquire-read
//! locktest --lockdir /mnt/shared/lock --host h2 --pid 2 acquire-write
//! locktest --lockdir /mnt/shared/lock --host h1 --pid 1 release
//! ```

use clap::{Parser, Subcommand};
use nfs_rwlock::{acquire_read, acquire_write, release, set_hostname, set_pid, LockConfig, LockError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "locktest", about = "Manual test driver for nfs-rwlock")]
struct Args {
    /// Shared lock directory, readable/writable by this process.
    #[arg(long)]
    lockdir: PathBuf,

    /// Microseconds to sleep between retries.
    #[arg(long, default_value_t = 100_000)]
    spin_usec: u64,

    /// Seconds after which a peer's entry is considered stale.
    #[arg(long, default_value_t = 30)]
    timeout_sec: u64,

    /// Override this process's identity host component (testing only).
    #[arg(long)]
    host: Option<String>,

    /// Override this process's identity pid component (testing only).
    #[arg(long)]
    pid: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Acquire the lock in read mode.
    AcquireRead,
    /// Acquire the lock in write mode.
    AcquireWrite,
    /// Release whatever lock this process holds.
    Release,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(host) = args.host {
        set_hostname(host);
    }
    if let Some(pid) = args.pid {
        set_pid(pid);
    }

    let cfg = LockConfig::new(&args.lockdir, args.spin_usec, args.timeout_sec);

    let result = match args.command {
        Command::AcquireRead => acquire_read(&cfg),
        Command::AcquireWrite => acquire_write(&cfg),
        Command::Release => release(&cfg),
    };

    match result {
        Ok(()) => {
            println!("GRANTED");
            ExitCode::SUCCESS
        }
        Err(LockError::TimedOut(secs)) => {
            eprintln!("{}", LockError::TimedOut(secs));
            println!("TIMED_OUT");
            ExitCode::FAILURE
        }
        Err(LockError::AlreadyLocked) => {
            eprintln!("{}", LockError::AlreadyLocked);
            println!("ALREADY_LOCKED");
            ExitCode::FAILURE
        }
        Err(e @ LockError::Io(_)) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
