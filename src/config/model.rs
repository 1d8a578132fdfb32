// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Launcher configuration as read from a TOML file.
///
/// ```toml
/// interpreter = "python3"
/// interpreter_args = ["-u"]
/// script = "n8n_mcp_server.py"
/// script_args = []
///
/// [env]
/// search_path_var = "PYTHONPATH"
/// encoding_var = "PYTHONIOENCODING"
/// encoding = "utf-8"
/// ```
///
/// All keys are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLauncherConfig {
    /// Program that runs the script. Looked up on `PATH` when not absolute.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Arguments placed between the interpreter and the script path.
    #[serde(default)]
    pub interpreter_args: Vec<String>,

    /// Script path, relative to the launcher's installation directory.
    #[serde(default = "default_script")]
    pub script: PathBuf,

    /// Arguments appended after the script path.
    #[serde(default)]
    pub script_args: Vec<String>,

    #[serde(default)]
    pub env: EnvSection,
}

/// `[env]` section: which two variables the overlay adds or overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvSection {
    /// Module search path variable; the launcher's parent directory is
    /// prepended to it.
    #[serde(default = "default_search_path_var")]
    pub search_path_var: String,

    /// Text encoding variable for the child's standard streams.
    #[serde(default = "default_encoding_var")]
    pub encoding_var: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_interpreter() -> String {
    "python3".to_string()
}

fn default_script() -> PathBuf {
    PathBuf::from("mcp_server.py")
}

fn default_search_path_var() -> String {
    "PYTHONPATH".to_string()
}

fn default_encoding_var() -> String {
    "PYTHONIOENCODING".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl Default for EnvSection {
    fn default() -> Self {
        Self {
            search_path_var: default_search_path_var(),
            encoding_var: default_encoding_var(),
            encoding: default_encoding(),
        }
    }
}

impl Default for RawLauncherConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            interpreter_args: Vec::new(),
            script: default_script(),
            script_args: Vec::new(),
            env: EnvSection::default(),
        }
    }
}

/// Validated launcher configuration.
///
/// Built from a `RawLauncherConfig` via `TryFrom` (see `validate.rs`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub interpreter: String,
    pub interpreter_args: Vec<String>,
    pub script: PathBuf,
    pub script_args: Vec<String>,
    pub env: EnvSection,
}

impl LauncherConfig {
    pub(crate) fn new_unchecked(raw: RawLauncherConfig) -> Self {
        Self {
            interpreter: raw.interpreter,
            interpreter_args: raw.interpreter_args,
            script: raw.script,
            script_args: raw.script_args,
            env: raw.env,
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self::new_unchecked(RawLauncherConfig::default())
    }
}
