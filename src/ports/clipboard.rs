use tracing::debug;

use super::{ClipboardError, ClipboardPort};

/// [`ClipboardPort`] backed by `arboard`.
///
/// The handle is opened lazily and dropped after a failure so the next call
/// reconnects. On X11/Wayland the selection is served only while this value
/// lives, which is why menu copies prefer handing text to the daemon.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let cb = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(cb);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("no clipboard handle".to_string()))
    }
}

impl ClipboardPort for SystemClipboard {
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
        match self.handle()?.get_text() {
            Ok(text) if text.is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(err) => {
                debug!(%err, "clipboard read failed, reconnecting next time");
                self.inner = None;
                Err(ClipboardError::Read(err.to_string()))
            }
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        match self.handle()?.set_text(text) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.inner = None;
                Err(ClipboardError::Write(err.to_string()))
            }
        }
    }
}
