use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio_util::sync::CancellationToken;

/// Process-wide termination flag. Set at most once, never reset.
#[derive(Clone, Default)]
pub struct Shutdown {
    fired: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Returns `true` only for the call that actually set
    /// the flag.
    pub fn trigger(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.cancel.cancel();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[cfg(unix)]
struct TerminationSignals {
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    fn install() -> anyhow::Result<Self> {
        use anyhow::Context;
        use tokio::signal::unix::{signal, SignalKind};

        let terminate = signal(SignalKind::terminate()).context("install SIGTERM handler")?;
        Ok(Self { terminate })
    }

    /// Waits for the next SIGINT or SIGTERM. `None` once delivery has stopped.
    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.ok().map(|_| "SIGINT"),
            res = self.terminate.recv() => res.map(|_| "SIGTERM"),
        }
    }
}

#[cfg(not(unix))]
struct TerminationSignals;

#[cfg(not(unix))]
impl TerminationSignals {
    fn install() -> anyhow::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> Option<&'static str> {
        tokio::signal::ctrl_c().await.ok().map(|_| "ctrl-c")
    }
}

/// Routes SIGINT and SIGTERM to `shutdown`. Must be called from within the
/// runtime; the listener only ever calls [`Shutdown::trigger`].
pub fn spawn_signal_listener(
    shutdown: Shutdown,
) -> anyhow::Result<tokio::task::JoinHandle<()>> {
    let mut signals = TerminationSignals::install()?;
    Ok(tokio::spawn(async move {
        while let Some(name) = signals.recv().await {
            if shutdown.trigger() {
                log::info!("{} received, shutting down", name);
            } else {
                log::debug!("{} received, shutdown already in progress", name);
            }
        }
        log::warn!("signal delivery stopped");
    }))
}

#[cfg(test)]
#[path = "signal_test.rs"]
mod signal_test;
