// src/child.rs

//! The one child process a launcher invocation owns.

use std::fmt;
use std::process::ExitStatus;

use tokio::process::Child;
use tracing::debug;

use crate::errors::Result;
use crate::signal::{self, RelayResult, SignalKind};

/// Lifecycle of the child as observed by the launcher.
///
/// `Starting → Running → {Exited(code) | Failed(signal)}`; terminal states
/// never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Starting,
    Running,
    /// Normal termination with an exit code.
    Exited(i32),
    /// Killed by a signal. `None` when the platform reported neither a code
    /// nor a signal number.
    Failed(Option<i32>),
}

impl ChildState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ChildState::Exited(_) | ChildState::Failed(_))
    }

    pub(crate) fn from_exit_status(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match (status.code(), status.signal()) {
            (Some(code), _) => ChildState::Exited(code),
            (None, sig) => ChildState::Failed(sig),
        }
    }
}

/// Spawned child plus its launcher-observed state.
pub struct ChildProcessHandle {
    pid: u32,
    state: ChildState,
    child: Child,
}

impl fmt::Debug for ChildProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildProcessHandle")
            .field("pid", &self.pid)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ChildProcessHandle {
    /// Wrap a freshly spawned child. Returns `None` if tokio already reaped it
    /// (no pid available), which only happens after a wait.
    pub(crate) fn running(child: Child) -> Option<Self> {
        let pid = child.id()?;
        Some(Self {
            pid,
            state: ChildState::Running,
            child,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn state(&self) -> ChildState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ChildState::Running
    }

    /// Forward `kind` to the child if it is still running.
    ///
    /// After the child has been reaped this is a no-op, so a recycled pid is
    /// never signalled.
    pub fn relay(&self, kind: SignalKind) -> Result<RelayResult> {
        if !self.is_running() {
            debug!(pid = self.pid, state = ?self.state, signal = %kind, "child not running; relay is a no-op");
            return Ok(RelayResult::Noop);
        }
        signal::send_signal(self.pid, kind)
    }

    /// Wait for the child to exit and record the terminal state.
    ///
    /// Cancel-safe: dropping the future before it completes leaves the state
    /// at `Running`.
    pub async fn wait(&mut self) -> Result<ChildState> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }
        let status = self.child.wait().await?;
        self.state = ChildState::from_exit_status(status);
        Ok(self.state)
    }
}
