#![allow(dead_code)]

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

pub use scriptrelay_test_utils::builders::{InstallDir, InstallDirBuilder};
pub use scriptrelay_test_utils::fake_signals::{ChannelSignalSource, SignalInjector};
pub use scriptrelay_test_utils::{init_tracing, with_timeout};

/// The test process's own environment, as the launcher would inherit it.
pub fn parent_env() -> Vec<(OsString, OsString)> {
    std::env::vars_os().collect()
}

/// Poll until `path` exists.
pub async fn wait_for_file(path: &Path) {
    while !path.exists() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Script that traps SIGINT/SIGTERM, appends the signal name to `$1`, and
/// exits with the shell convention code. Touches `$2` once traps are set.
pub const TRAPPING_SCRIPT: &str = r#"
trap 'echo INT >> "$1"; exit 130' INT
trap 'echo TERM >> "$1"; exit 143' TERM
: > "$2"
while :; do sleep 0.1; done
"#;
