// src/config/validate.rs

use crate::config::model::{EnvSection, LauncherConfig, RawLauncherConfig};
use crate::errors::{LauncherError, Result};

impl TryFrom<RawLauncherConfig> for LauncherConfig {
    type Error = LauncherError;

    fn try_from(raw: RawLauncherConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(LauncherConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawLauncherConfig) -> Result<()> {
    validate_command(cfg)?;
    validate_env_section(&cfg.env)?;
    Ok(())
}

fn validate_command(cfg: &RawLauncherConfig) -> Result<()> {
    if cfg.interpreter.trim().is_empty() {
        return Err(LauncherError::ConfigError(
            "`interpreter` must not be empty".to_string(),
        ));
    }

    if cfg.script.as_os_str().is_empty() {
        return Err(LauncherError::ConfigError(
            "`script` must not be empty".to_string(),
        ));
    }

    // The target always lives under the installation directory.
    if cfg.script.is_absolute() {
        return Err(LauncherError::ConfigError(format!(
            "`script` must be relative to the installation directory (got {:?})",
            cfg.script
        )));
    }

    Ok(())
}

fn validate_env_section(env: &EnvSection) -> Result<()> {
    validate_var_name("env.search_path_var", &env.search_path_var)?;
    validate_var_name("env.encoding_var", &env.encoding_var)?;

    if env.search_path_var == env.encoding_var {
        return Err(LauncherError::ConfigError(format!(
            "`env.search_path_var` and `env.encoding_var` must differ (both are '{}')",
            env.search_path_var
        )));
    }

    if env.encoding.contains('\0') {
        return Err(LauncherError::ConfigError(
            "`env.encoding` must not contain NUL".to_string(),
        ));
    }

    Ok(())
}

fn validate_var_name(key: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LauncherError::ConfigError(format!(
            "`{key}` must not be empty"
        )));
    }
    if name.contains('=') || name.contains('\0') {
        return Err(LauncherError::ConfigError(format!(
            "`{key}` is not a valid environment variable name: '{name}'"
        )));
    }
    Ok(())
}
