// src/config/mod.rs

//! Launcher configuration.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Locate and load an optional config file (`loader.rs`).
//! - Validate it into a [`LauncherConfig`] (`validate.rs`).
//!
//! Every field has a default, so running without a config file launches
//! `python3 mcp_server.py` from the installation directory.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    DEFAULT_CONFIG_FILE, default_config_path, load_and_validate, load_from_path, resolve_config,
};
pub use model::{EnvSection, LauncherConfig, RawLauncherConfig};
