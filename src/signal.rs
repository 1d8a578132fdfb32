// src/signal.rs

//! Termination signals the launcher relays, and where they come from.
//!
//! The supervisor does not register OS handlers itself. It reads from a
//! [`SignalSource`], which makes the registration explicit and scoped:
//!
//! - [`UnixSignalSource`] owns tokio's SIGINT/SIGTERM streams for as long as
//!   the launcher supervises a child, and drops them afterwards.
//! - Tests provide a channel-backed source to inject signals deterministically.

use std::fmt;
use std::future::Future;
use std::io;
use std::pin::Pin;

use nix::errno::Errno;
use nix::sys::signal::{self as nix_signal, Signal};
use nix::unistd::Pid;
use tokio::signal::unix::{self, SignalKind as TokioSignalKind};
use tracing::debug;

use crate::errors::{LauncherError, Result};

/// A termination request the launcher forwards to its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// SIGINT (Ctrl+C).
    Interrupt,
    /// SIGTERM.
    Terminate,
}

impl SignalKind {
    pub fn to_nix(self) -> Signal {
        match self {
            SignalKind::Interrupt => Signal::SIGINT,
            SignalKind::Terminate => Signal::SIGTERM,
        }
    }

    /// Raw OS signal number.
    pub fn as_raw(self) -> i32 {
        self.to_nix() as i32
    }

    pub fn as_str(self) -> &'static str {
        self.to_nix().as_str()
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened when a signal was relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayResult {
    /// The signal was handed to the child.
    Delivered,
    /// No running child to deliver to. Not an error.
    Noop,
}

/// Send `kind` to `pid`.
///
/// `ESRCH` (the process is gone) maps to [`RelayResult::Noop`].
pub fn send_signal(pid: u32, kind: SignalKind) -> Result<RelayResult> {
    let raw = i32::try_from(pid).map_err(|_| LauncherError::Relay {
        pid,
        signal: kind.as_str(),
        source: Errno::EINVAL,
    })?;

    match nix_signal::kill(Pid::from_raw(raw), kind.to_nix()) {
        Ok(()) => Ok(RelayResult::Delivered),
        Err(Errno::ESRCH) => {
            debug!(pid, signal = %kind, "child already gone; relay is a no-op");
            Ok(RelayResult::Noop)
        }
        Err(source) => Err(LauncherError::Relay {
            pid,
            signal: kind.as_str(),
            source,
        }),
    }
}

/// Stream of termination requests addressed to the launcher.
///
/// `None` means the source is exhausted and will never yield again.
pub trait SignalSource: Send {
    fn next_signal(&mut self) -> Pin<Box<dyn Future<Output = Option<SignalKind>> + Send + '_>>;
}

/// SIGINT/SIGTERM registrations for the launcher process.
///
/// Registration lasts as long as this value. Once a stream is registered the
/// signal no longer terminates the launcher by default; the child's exit does.
///
/// The child shares the launcher's process group. A Ctrl+C typed at a
/// terminal therefore reaches the child twice: directly from the tty, and
/// once more through the relay. Signals sent to the launcher's pid alone
/// (`kill -INT <pid>`) reach the child exactly once.
pub struct UnixSignalSource {
    interrupt: unix::Signal,
    terminate: unix::Signal,
}

impl UnixSignalSource {
    /// Must be called from within a tokio runtime.
    pub fn register() -> io::Result<Self> {
        Ok(Self {
            interrupt: unix::signal(TokioSignalKind::interrupt())?,
            terminate: unix::signal(TokioSignalKind::terminate())?,
        })
    }
}

impl fmt::Debug for UnixSignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnixSignalSource").finish_non_exhaustive()
    }
}

impl SignalSource for UnixSignalSource {
    fn next_signal(&mut self) -> Pin<Box<dyn Future<Output = Option<SignalKind>> + Send + '_>> {
        Box::pin(async move {
            tokio::select! {
                got = self.interrupt.recv() => got.map(|()| SignalKind::Interrupt),
                got = self.terminate.recv() => got.map(|()| SignalKind::Terminate),
            }
        })
    }
}

/// A source that never yields. Supervision then waits on the child alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignals;

impl SignalSource for NoSignals {
    fn next_signal(&mut self) -> Pin<Box<dyn Future<Output = Option<SignalKind>> + Send + '_>> {
        Box::pin(std::future::pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_posix_numbers() {
        assert_eq!(SignalKind::Interrupt.as_raw(), 2);
        assert_eq!(SignalKind::Terminate.as_raw(), 15);
        assert_eq!(SignalKind::Interrupt.to_string(), "SIGINT");
        assert_eq!(SignalKind::Terminate.to_string(), "SIGTERM");
    }

    #[test]
    fn relay_to_vanished_pid_is_noop() {
        // Spawn and reap a short-lived process; its pid is then unused for the
        // few microseconds this test needs it.
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        let res = send_signal(pid, SignalKind::Terminate).unwrap();
        assert_eq!(res, RelayResult::Noop);
    }

    #[test]
    fn out_of_range_pid_is_a_relay_error() {
        let err = send_signal(u32::MAX, SignalKind::Interrupt).unwrap_err();
        assert!(matches!(err, LauncherError::Relay { .. }), "{err:?}");
    }
}
