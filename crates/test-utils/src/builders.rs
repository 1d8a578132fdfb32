#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use scriptrelay::config::{LauncherConfig, RawLauncherConfig};
use scriptrelay::launcher::Launcher;
use tempfile::TempDir;

/// Builder for a throwaway installation directory holding shell-script
/// targets.
///
/// Layout: `<tmp>/pkg/<name>` is the install directory, so the launcher's
/// search directory is `<tmp>/pkg`.
pub struct InstallDirBuilder {
    name: String,
    scripts: Vec<(String, String)>,
    config_toml: Option<String>,
}

impl InstallDirBuilder {
    pub fn new() -> Self {
        Self {
            name: "server".to_string(),
            scripts: Vec::new(),
            config_toml: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Add a `sh` script with the given body.
    pub fn with_script(mut self, file: &str, body: &str) -> Self {
        self.scripts.push((file.to_string(), body.to_string()));
        self
    }

    /// Write `scriptrelay.toml` into the install directory.
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config_toml = Some(toml.to_string());
        self
    }

    pub fn build(self) -> InstallDir {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let dir = tmp.path().join("pkg").join(&self.name);
        fs::create_dir_all(&dir).expect("Failed to create install dir");

        for (file, body) in &self.scripts {
            fs::write(dir.join(file), body).expect("Failed to write script");
        }

        if let Some(toml) = &self.config_toml {
            fs::write(dir.join("scriptrelay.toml"), toml).expect("Failed to write config");
        }

        InstallDir { _tmp: tmp, dir }
    }
}

impl Default for InstallDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A populated installation directory; deleted on drop.
pub struct InstallDir {
    _tmp: TempDir,
    dir: PathBuf,
}

impl InstallDir {
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Scratch file path inside the temp dir, outside the install directory.
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.dir.parent().expect("install dir has a parent").join(name)
    }

    /// Launcher that runs `script` with `sh`.
    pub fn sh_launcher(&self, script: &str) -> Launcher {
        self.launcher_with(RawLauncherConfig {
            interpreter: "sh".to_string(),
            script: PathBuf::from(script),
            ..RawLauncherConfig::default()
        })
    }

    pub fn launcher_with(&self, raw: RawLauncherConfig) -> Launcher {
        let config = LauncherConfig::try_from(raw).expect("Failed to build valid config");
        Launcher::new(self.dir.clone(), config)
    }
}
