use std::future::Future;
use std::time::Duration;

use tokio::{
    sync::broadcast,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, info, warn};

use crate::{
    clip::is_blank,
    config::Settings,
    core::{preview::PreviewOptions, ring::Observed},
    persist::{self, PersistError, StateBackend},
    ports::{ClipboardError, ClipboardPort, Notifier},
};

use super::{
    events::WatchEvent,
    handoff::{HandoffError, HandoffListener, Incoming},
};

/// Summary line of capture notifications.
pub const CAPTURED_SUMMARY: &str = "New clip";
/// Summary line of copy-back notifications.
pub const COPIED_SUMMARY: &str = "Copied to the clipboard.";

#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Handoff(#[from] HandoffError),
}

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub ring_size: usize,
    pub preview: PreviewOptions,
    pub notify_timeout: Duration,
    pub notify: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl WatcherConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            ring_size: settings.ring_size,
            preview: settings.preview_options(),
            notify_timeout: settings.notify_timeout(),
            notify: settings.notify,
        }
    }
}

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No text, or only whitespace, on the clipboard.
    Empty,
    /// Same text as the previous successful sample.
    Unchanged,
    /// Text recorded in the ring.
    Captured(Observed),
    /// Clipboard read failed.
    ReadFailed,
    /// Ring write failed; the sample is retried next tick.
    StoreFailed,
}

/// Fixed-interval clipboard sampler feeding the ring.
///
/// Only text that differs from the last successfully recorded sample is
/// stored and announced. The cache lives in memory only; at start-up it is
/// seeded with the head of the stored ring so a restart stays quiet.
pub struct Watcher {
    clipboard: Box<dyn ClipboardPort>,
    backend: Box<dyn StateBackend>,
    notifier: Box<dyn Notifier>,
    config: WatcherConfig,
    last_seen: Option<String>,
    events_tx: broadcast::Sender<WatchEvent>,
}

impl Watcher {
    pub fn new(
        clipboard: Box<dyn ClipboardPort>,
        mut backend: Box<dyn StateBackend>,
        notifier: Box<dyn Notifier>,
        config: WatcherConfig,
    ) -> Self {
        let last_seen = match backend.read_ring() {
            Ok(entries) => entries.into_iter().next(),
            Err(err) => {
                warn!(%err, "could not read stored ring, starting without a cache");
                None
            }
        };
        let (events_tx, _) = broadcast::channel(256);
        Self {
            clipboard,
            backend,
            notifier,
            config,
            last_seen,
            events_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WatchEvent> {
        self.events_tx.subscribe()
    }

    pub fn last_seen(&self) -> Option<&str> {
        self.last_seen.as_deref()
    }

    /// One poll: read, compare with the cache, record and announce on change.
    pub fn tick(&mut self) -> TickOutcome {
        let text = match self.clipboard.get_text() {
            Ok(Some(text)) => text,
            Ok(None) => return TickOutcome::Empty,
            Err(err) => {
                debug!(%err, "clipboard read failed, retrying next tick");
                let _ = self.events_tx.send(WatchEvent::ReadSkipped);
                return TickOutcome::ReadFailed;
            }
        };
        if is_blank(&text) {
            return TickOutcome::Empty;
        }
        if self.last_seen.as_deref() == Some(text.as_str()) {
            return TickOutcome::Unchanged;
        }

        let observed = match self.record(&text) {
            Ok(observed) => observed,
            Err(err) => {
                warn!(%err, "failed to record clip, retrying next tick");
                let _ = self.events_tx.send(WatchEvent::StoreFailed);
                return TickOutcome::StoreFailed;
            }
        };

        let preview = self.config.preview.render(&text);
        info!(?observed, chars = text.chars().count(), "clip captured");
        self.last_seen = Some(text);
        self.notify(CAPTURED_SUMMARY, &preview);
        let _ = self.events_tx.send(WatchEvent::Captured { preview, observed });
        TickOutcome::Captured(observed)
    }

    /// Puts text chosen in a menu on the clipboard and records it.
    ///
    /// A failed ring write is logged only: the clipboard already holds the
    /// text, which is what the caller asked for.
    pub fn accept_handoff(&mut self, text: &str) -> Result<(), WatcherError> {
        self.clipboard.set_text(text)?;
        self.last_seen = Some(text.to_string());
        if let Err(err) = self.record(text) {
            warn!(%err, "handed-off clip not recorded");
        }
        let preview = self.config.preview.render(text);
        self.notify(COPIED_SUMMARY, &preview);
        let _ = self.events_tx.send(WatchEvent::HandedOff { preview });
        Ok(())
    }

    /// Polls until `shutdown` resolves, serving handoffs between ticks.
    ///
    /// Ticks and handoffs run strictly one at a time on this task.
    pub async fn run<F>(mut self, listener: Option<HandoffListener>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);
        info!(
            interval_ms = self.config.poll_interval.as_millis() as u64,
            ring_size = self.config.ring_size,
            "watcher started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.tick();
                }
                incoming = next_handoff(listener.as_ref()) => match incoming {
                    Ok(incoming) => self.serve_handoff(incoming).await,
                    Err(err) => warn!(%err, "handoff accept failed"),
                },
            }
        }

        info!("watcher stopped");
        let _ = self.events_tx.send(WatchEvent::Stopped);
    }

    async fn serve_handoff(&mut self, mut incoming: Incoming) {
        let text = match incoming.read_text().await {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "rejected handoff");
                return;
            }
        };
        match self.accept_handoff(&text) {
            Ok(()) => incoming.ack().await,
            Err(err) => warn!(%err, "handoff not applied, client falls back"),
        }
    }

    fn record(&mut self, text: &str) -> Result<Observed, PersistError> {
        persist::update_ring(self.backend.as_mut(), self.config.ring_size, |ring| {
            ring.observe(text)
        })
    }

    fn notify(&self, summary: &str, body: &str) {
        if self.config.notify {
            self.notifier
                .notify(summary, body, self.config.notify_timeout);
        }
    }
}

async fn next_handoff(listener: Option<&HandoffListener>) -> Result<Incoming, HandoffError> {
    match listener {
        Some(listener) => listener.accept().await,
        None => std::future::pending().await,
    }
}
