// src/lib.rs

pub mod child;
pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod launcher;
pub mod logging;
pub mod signal;

use std::io::Write;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::resolve_config;
use crate::errors::Result;
use crate::launcher::{LaunchPlan, Launcher, current_install_dir};
use crate::signal::UnixSignalSource;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - install directory + config resolution
/// - SIGINT/SIGTERM registration (before the spawn, so nothing is missed)
/// - start + supervise of the child
///
/// Returns the exit code the launcher must terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let install_dir = current_install_dir()?;
    debug!(install_dir = ?install_dir, "resolved installation directory");

    let config = resolve_config(args.config.as_deref(), &install_dir)?;
    let launcher = Launcher::new(install_dir, config);

    if args.dry_run {
        let plan = launcher.plan(std::env::vars_os())?;
        print_dry_run(&plan)?;
        return Ok(0);
    }

    let mut signals = UnixSignalSource::register()?;
    let outcome = launcher.run(std::env::vars_os(), &mut signals).await?;

    // Registrations end here; the process exits right after.
    drop(signals);

    Ok(outcome.code)
}

/// Print the resolved command and the overlay entries the launcher sets.
fn print_dry_run(plan: &LaunchPlan) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "scriptrelay dry-run")?;
    writeln!(out, "  program: {}", plan.program.to_string_lossy())?;
    for arg in &plan.args {
        writeln!(out, "  arg: {}", arg.to_string_lossy())?;
    }
    writeln!(out, "  target: {}", plan.target.display())?;
    for key in plan.env.overridden_keys() {
        let value = plan.env.get(key).unwrap_or_default();
        writeln!(
            out,
            "  env: {}={}",
            key.to_string_lossy(),
            value.to_string_lossy()
        )?;
    }

    Ok(())
}
