mod common;
use crate::common::{
    ChannelSignalSource, InstallDirBuilder, TRAPPING_SCRIPT, init_tracing, parent_env,
    wait_for_file, with_timeout,
};

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use scriptrelay::child::ChildState;
use scriptrelay::config::RawLauncherConfig;
use scriptrelay::launcher::ExitOutcome;
use scriptrelay::signal::SignalKind;

type TestResult = Result<(), Box<dyn Error>>;

fn trapping_config(marks: &PathBuf, ready: &PathBuf) -> RawLauncherConfig {
    RawLauncherConfig {
        interpreter: "sh".into(),
        script: PathBuf::from("trap.sh"),
        script_args: vec![
            marks.to_string_lossy().into_owned(),
            ready.to_string_lossy().into_owned(),
        ],
        ..RawLauncherConfig::default()
    }
}

async fn relay_once(kind: SignalKind, expected_mark: &str, expected_code: i32) -> TestResult {
    init_tracing();

    let install = InstallDirBuilder::new()
        .with_script("trap.sh", TRAPPING_SCRIPT)
        .build();
    let marks = install.scratch("marks");
    let ready = install.scratch("ready");
    let launcher = install.launcher_with(trapping_config(&marks, &ready));

    let handle = launcher.start(parent_env()).await?;
    assert_eq!(handle.state(), ChildState::Running);

    let (injector, mut source) = ChannelSignalSource::new();

    let supervise = launcher.supervise(handle, &mut source);
    let driver = async {
        wait_for_file(&ready).await;
        assert!(injector.deliver(kind));
    };

    let (outcome, ()) = with_timeout(async { tokio::join!(supervise, driver) }).await;
    let outcome = outcome?;

    assert_eq!(
        outcome,
        ExitOutcome {
            code: expected_code,
            signal: None
        }
    );
    assert_eq!(fs::read_to_string(&marks)?, format!("{expected_mark}\n"));

    Ok(())
}

#[tokio::test]
async fn interrupt_is_relayed_exactly_once() -> TestResult {
    relay_once(SignalKind::Interrupt, "INT", 130).await
}

#[tokio::test]
async fn terminate_is_relayed_exactly_once() -> TestResult {
    relay_once(SignalKind::Terminate, "TERM", 143).await
}

#[tokio::test]
async fn launcher_waits_for_child_after_relaying() -> TestResult {
    init_tracing();

    // The child takes its time to shut down after the signal; supervision
    // must last until it actually exits.
    let script = r#"
trap 'sleep 0.3; echo done > "$1"; exit 3' TERM
: > "$2"
while :; do sleep 0.1; done
"#;
    let install = InstallDirBuilder::new()
        .with_script("trap.sh", script)
        .build();
    let marks = install.scratch("marks");
    let ready = install.scratch("ready");
    let launcher = install.launcher_with(trapping_config(&marks, &ready));

    let handle = launcher.start(parent_env()).await?;
    let (injector, mut source) = ChannelSignalSource::new();

    let supervise = launcher.supervise(handle, &mut source);
    let driver = async {
        wait_for_file(&ready).await;
        injector.deliver(SignalKind::Terminate);
    };

    let (outcome, ()) = with_timeout(async { tokio::join!(supervise, driver) }).await;
    assert_eq!(outcome?.code, 3);
    assert_eq!(fs::read_to_string(&marks)?, "done\n");

    Ok(())
}

#[tokio::test]
async fn signal_racing_child_exit_does_not_change_outcome() -> TestResult {
    init_tracing();

    let install = InstallDirBuilder::new()
        .with_script("quick.sh", ": > \"$1\"\nexit 5\n")
        .build();
    let ready = install.scratch("exited");
    let launcher = install.launcher_with(RawLauncherConfig {
        interpreter: "sh".into(),
        script: PathBuf::from("quick.sh"),
        script_args: vec![ready.to_string_lossy().into_owned()],
        ..RawLauncherConfig::default()
    });

    let handle = launcher.start(parent_env()).await?;

    // Let the child exit before any signal is queued. It stays unreaped until
    // supervision, so a queued signal may still be delivered to the zombie or
    // be dropped once the wait wins; either way the outcome is fixed.
    with_timeout(wait_for_file(&ready)).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (injector, mut source) = ChannelSignalSource::new();
    injector.deliver(SignalKind::Interrupt);
    injector.deliver(SignalKind::Terminate);

    let outcome = with_timeout(launcher.supervise(handle, &mut source)).await?;
    assert_eq!(outcome, ExitOutcome { code: 5, signal: None });

    // Late deliveries after supervision are simply never read.
    injector.deliver(SignalKind::Interrupt);

    Ok(())
}
