use std::future::Future;
use std::pin::Pin;

use scriptrelay::signal::{SignalKind, SignalSource};
use tokio::sync::mpsc;

/// A signal source fed by the test instead of the OS.
///
/// Dropping the paired [`SignalInjector`] exhausts the source.
pub struct ChannelSignalSource {
    rx: mpsc::UnboundedReceiver<SignalKind>,
}

/// Test-side handle for delivering "signals" to the launcher.
#[derive(Clone)]
pub struct SignalInjector {
    tx: mpsc::UnboundedSender<SignalKind>,
}

impl ChannelSignalSource {
    pub fn new() -> (SignalInjector, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SignalInjector { tx }, Self { rx })
    }
}

impl SignalInjector {
    /// Returns false if the launcher is no longer listening.
    pub fn deliver(&self, kind: SignalKind) -> bool {
        self.tx.send(kind).is_ok()
    }
}

impl SignalSource for ChannelSignalSource {
    fn next_signal(&mut self) -> Pin<Box<dyn Future<Output = Option<SignalKind>> + Send + '_>> {
        Box::pin(self.rx.recv())
    }
}
