use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReloadEvent {
    pub epoch: u64,
}

/// Fan-out of reload requests to the supervisor loop.
#[derive(Clone)]
pub struct ReloadHandle {
    tx: watch::Sender<ReloadEvent>,
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ReloadEvent::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    pub fn notify_reload(&self) {
        self.tx.send_modify(|ev| ev.epoch += 1);
        let epoch = self.tx.borrow().epoch;
        tracing::info!(epoch, "reload signaled");
    }

    /// Turn every SIGHUP into a reload notification. Runs until the signal
    /// stream closes.
    pub async fn install_signal_handler(&self) -> anyhow::Result<()> {
        let mut hup = signal(SignalKind::hangup())?;

        while hup.recv().await.is_some() {
            tracing::info!("SIGHUP received");
            self.notify_reload();
        }
        Ok(())
    }
}
