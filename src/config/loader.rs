// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{LauncherConfig, RawLauncherConfig};
use crate::errors::Result;

/// File name looked up next to the launcher binary.
pub const DEFAULT_CONFIG_FILE: &str = "scriptrelay.toml";

/// Load a configuration file and return the raw `RawLauncherConfig`.
///
/// Only TOML deserialization; see [`load_and_validate`] for the checked form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawLauncherConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawLauncherConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<LauncherConfig> {
    let raw_config = load_from_path(&path)?;
    let config = LauncherConfig::try_from(raw_config)?;
    Ok(config)
}

/// Where the implicit config file lives for a given installation directory.
pub fn default_config_path(install_dir: &Path) -> PathBuf {
    install_dir.join(DEFAULT_CONFIG_FILE)
}

/// Pick the effective configuration.
///
/// - An explicit path (from `--config`) must exist and be valid.
/// - Otherwise `scriptrelay.toml` in the installation directory is used if
///   present.
/// - Otherwise the built-in defaults apply.
pub fn resolve_config(explicit: Option<&Path>, install_dir: &Path) -> Result<LauncherConfig> {
    if let Some(path) = explicit {
        debug!(path = ?path, "loading launcher config from --config");
        return load_and_validate(path);
    }

    let implicit = default_config_path(install_dir);
    if implicit.is_file() {
        debug!(path = ?implicit, "loading launcher config from installation directory");
        return load_and_validate(&implicit);
    }

    debug!("no launcher config file; using defaults");
    Ok(LauncherConfig::default())
}
