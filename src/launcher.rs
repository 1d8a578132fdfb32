// src/launcher.rs

//! Spawn the target script, relay signals to it, and turn its termination
//! into the launcher's own exit status.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::child::{ChildProcessHandle, ChildState};
use crate::config::LauncherConfig;
use crate::env::EnvironmentOverlay;
use crate::errors::{LauncherError, Result};
use crate::signal::{RelayResult, SignalSource};

/// Exit code used when the child reports neither an exit code nor a signal.
pub const UNKNOWN_TERMINATION_CODE: i32 = 1;

/// Offset added to a signal number when the child was killed by a signal,
/// as shells do.
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// How the child ended, and what the launcher must exit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Process exit code for the launcher.
    pub code: i32,
    /// Signal that killed the child, if any.
    pub signal: Option<i32>,
}

impl ExitOutcome {
    /// Map a terminal child state to the launcher's exit code.
    ///
    /// - `Exited(c)` → `c`
    /// - `Failed(Some(s))` → `128 + s`
    /// - `Failed(None)` → `1`
    ///
    /// Non-terminal states are not outcomes and map to `None`.
    pub fn from_state(state: ChildState) -> Option<Self> {
        match state {
            ChildState::Exited(code) => Some(Self { code, signal: None }),
            ChildState::Failed(Some(sig)) => Some(Self {
                code: SIGNAL_EXIT_BASE + sig,
                signal: Some(sig),
            }),
            ChildState::Failed(None) => Some(Self {
                code: UNKNOWN_TERMINATION_CODE,
                signal: None,
            }),
            ChildState::Starting | ChildState::Running => None,
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        // An ExitStatus always describes a terminated process.
        Self::from_state(ChildState::from_exit_status(status)).unwrap_or(Self {
            code: UNKNOWN_TERMINATION_CODE,
            signal: None,
        })
    }
}

/// Fully resolved command line and environment for the child.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub target: PathBuf,
    pub env: EnvironmentOverlay,
}

impl LaunchPlan {
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .env_clear()
            .envs(self.env.iter())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

/// Single-child launcher rooted at its installation directory.
#[derive(Debug, Clone)]
pub struct Launcher {
    install_dir: PathBuf,
    config: LauncherConfig,
}

impl Launcher {
    pub fn new(install_dir: impl Into<PathBuf>, config: LauncherConfig) -> Self {
        Self {
            install_dir: install_dir.into(),
            config,
        }
    }

    /// The script to run, independent of the caller's working directory.
    pub fn target_path(&self) -> PathBuf {
        self.install_dir.join(&self.config.script)
    }

    /// Directory added to the child's module search path: the parent of the
    /// installation directory, or the installation directory itself at `/`.
    pub fn search_dir(&self) -> &Path {
        self.install_dir.parent().unwrap_or(self.install_dir.as_path())
    }

    /// Resolve program, arguments and environment without spawning anything.
    pub fn plan<I, K, V>(&self, base_env: I) -> Result<LaunchPlan>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let target = self.target_path();
        let env = EnvironmentOverlay::build(base_env, &self.config.env, self.search_dir())?;

        let mut args: Vec<OsString> = self
            .config
            .interpreter_args
            .iter()
            .map(OsString::from)
            .collect();
        args.push(target.clone().into_os_string());
        args.extend(self.config.script_args.iter().map(OsString::from));

        Ok(LaunchPlan {
            program: OsString::from(&self.config.interpreter),
            args,
            target,
            env,
        })
    }

    /// Spawn the target with inherited stdio and the overlaid environment.
    ///
    /// A missing target is reported as a spawn failure up front, since the
    /// interpreter would otherwise start and fail on its own.
    pub async fn start<I, K, V>(&self, base_env: I) -> Result<ChildProcessHandle>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let plan = self.plan(base_env)?;
        debug!(state = ?ChildState::Starting, target = ?plan.target, "starting child");

        match tokio::fs::metadata(&plan.target).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(LauncherError::Spawn {
                    program: plan.target,
                    source: io::Error::new(io::ErrorKind::InvalidInput, "target is not a file"),
                });
            }
            Err(source) => {
                return Err(LauncherError::Spawn {
                    program: plan.target,
                    source,
                });
            }
        }

        let child = plan
            .command()
            .spawn()
            .map_err(|source| LauncherError::Spawn {
                program: PathBuf::from(&plan.program),
                source,
            })?;

        let handle = ChildProcessHandle::running(child).ok_or_else(|| LauncherError::Spawn {
            program: PathBuf::from(&plan.program),
            source: io::Error::other("child exited before its pid could be read"),
        })?;

        info!(
            pid = handle.pid(),
            program = ?plan.program,
            target = ?plan.target,
            "child running"
        );

        Ok(handle)
    }

    /// Wait for the child, relaying every signal from `signals` while it runs.
    ///
    /// The launcher never exits because of a relayed signal; only the child's
    /// termination ends supervision.
    pub async fn supervise<S>(
        &self,
        mut handle: ChildProcessHandle,
        signals: &mut S,
    ) -> Result<ExitOutcome>
    where
        S: SignalSource + ?Sized,
    {
        let mut signals_open = true;

        let state = loop {
            tokio::select! {
                state = handle.wait() => break state?,
                next = signals.next_signal(), if signals_open => match next {
                    Some(kind) => match handle.relay(kind) {
                        Ok(RelayResult::Delivered) => {
                            info!(pid = handle.pid(), signal = %kind, "relayed signal to child");
                        }
                        Ok(RelayResult::Noop) => {}
                        Err(err) => {
                            warn!(pid = handle.pid(), signal = %kind, error = %err, "failed to relay signal");
                        }
                    },
                    None => {
                        debug!("signal source exhausted; waiting on child only");
                        signals_open = false;
                    }
                },
            }
        };

        let outcome = ExitOutcome::from_state(state).unwrap_or(ExitOutcome {
            code: UNKNOWN_TERMINATION_CODE,
            signal: None,
        });

        info!(
            pid = handle.pid(),
            state = ?state,
            exit_code = outcome.code,
            "child finished"
        );

        Ok(outcome)
    }

    /// `start` followed by `supervise`.
    pub async fn run<I, K, V, S>(&self, base_env: I, signals: &mut S) -> Result<ExitOutcome>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
        S: SignalSource + ?Sized,
    {
        let handle = self.start(base_env).await?;
        self.supervise(handle, signals).await
    }
}

/// Directory containing the running launcher executable, symlinks resolved.
pub fn current_install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            LauncherError::ConfigError(format!(
                "launcher executable {:?} has no parent directory",
                exe
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    #[test]
    fn outcome_mapping() {
        assert_eq!(
            ExitOutcome::from_state(ChildState::Exited(7)),
            Some(ExitOutcome { code: 7, signal: None })
        );
        assert_eq!(
            ExitOutcome::from_state(ChildState::Failed(Some(9))),
            Some(ExitOutcome { code: 137, signal: Some(9) })
        );
        assert_eq!(
            ExitOutcome::from_state(ChildState::Failed(None)),
            Some(ExitOutcome { code: 1, signal: None })
        );
        assert_eq!(ExitOutcome::from_state(ChildState::Running), None);
        assert_eq!(ExitOutcome::from_state(ChildState::Starting), None);
    }

    #[test]
    fn target_and_search_dir_come_from_install_dir() {
        let launcher = Launcher::new("/opt/relay/mcp_n8n", LauncherConfig::default());
        assert_eq!(
            launcher.target_path(),
            PathBuf::from("/opt/relay/mcp_n8n/mcp_server.py")
        );
        assert_eq!(launcher.search_dir(), Path::new("/opt/relay"));

        let at_root = Launcher::new("/", LauncherConfig::default());
        assert_eq!(at_root.search_dir(), Path::new("/"));
    }

    #[test]
    fn plan_orders_arguments() {
        let mut config = LauncherConfig::default();
        config.interpreter_args = vec!["-u".into()];
        config.script_args = vec!["--stdio".into()];
        let launcher = Launcher::new("/opt/relay/bin", config);

        let plan = launcher.plan(vec![("HOME", "/root")]).unwrap();
        assert_eq!(plan.program, OsString::from("python3"));
        assert_eq!(
            plan.args,
            vec![
                OsString::from("-u"),
                OsString::from("/opt/relay/bin/mcp_server.py"),
                OsString::from("--stdio"),
            ]
        );
        assert_eq!(plan.env.get("PYTHONPATH"), Some(OsStr::new("/opt/relay")));
        assert_eq!(plan.env.get("HOME"), Some(OsStr::new("/root")));
    }
}
