// src/env.rs

//! Environment handed to the child: the parent's environment plus two
//! launcher-owned entries (module search path, stream encoding).

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::config::EnvSection;
use crate::errors::{LauncherError, Result};

/// Parent environment plus a fixed set of additive/overriding entries.
///
/// Immutable once built; [`crate::launcher::Launcher::start`] consumes it when
/// spawning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentOverlay {
    vars: BTreeMap<OsString, OsString>,
    overridden: Vec<OsString>,
}

impl EnvironmentOverlay {
    /// Copy `base` and apply the launcher's entries.
    ///
    /// - `env.search_path_var` becomes `search_dir`, followed by whatever the
    ///   base environment already had for it (platform path-list separator).
    /// - `env.encoding_var` is set to `env.encoding`, replacing any base value.
    pub fn build<I, K, V>(base: I, env: &EnvSection, search_dir: &Path) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let mut vars: BTreeMap<OsString, OsString> = base
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let search_key = OsString::from(&env.search_path_var);
        let search_value = prepend_search_path(search_dir, vars.get(&search_key))?;
        vars.insert(search_key.clone(), search_value);

        let encoding_key = OsString::from(&env.encoding_var);
        vars.insert(encoding_key.clone(), OsString::from(&env.encoding));

        Ok(Self {
            vars,
            overridden: vec![search_key, encoding_key],
        })
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Keys the launcher added or overrode, in application order.
    pub fn overridden_keys(&self) -> &[OsString] {
        &self.overridden
    }
}

fn prepend_search_path(dir: &Path, existing: Option<&OsString>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        entries.extend(std::env::split_paths(existing));
    }
    std::env::join_paths(entries).map_err(|e| {
        LauncherError::ConfigError(format!(
            "cannot add {:?} to the module search path: {e}",
            dir
        ))
    })
}
