// src/errors.rs

//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    /// The child could not be started at all.
    #[error("failed to spawn {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The OS refused to deliver a relayed signal for a reason other than
    /// "no such process".
    #[error("failed to relay {signal} to pid {pid}: {source}")]
    Relay {
        pid: u32,
        signal: &'static str,
        #[source]
        source: nix::errno::Errno,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl LauncherError {
    /// Exit status the launcher terminates with when it fails on its own
    /// (as opposed to propagating the child's status).
    pub fn exit_code(&self) -> i32 {
        1
    }

    pub fn is_spawn(&self) -> bool {
        matches!(self, LauncherError::Spawn { .. })
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
