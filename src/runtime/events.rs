//! Watcher event stream payloads.

use crate::core::ring::Observed;

/// Events emitted from the watcher loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// New clipboard text was recorded in the ring.
    Captured {
        /// Rendered preview of the text.
        preview: String,
        /// How the ring absorbed it.
        observed: Observed,
    },
    /// A menu selection was handed over and put on the clipboard.
    HandedOff {
        /// Rendered preview of the text.
        preview: String,
    },
    /// Reading the clipboard failed; retried on the next tick.
    ReadSkipped,
    /// Writing the ring failed; retried on the next tick.
    StoreFailed,
    /// The loop exited.
    Stopped,
}
