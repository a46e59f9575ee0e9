//! Collaborator interfaces for the clipboard, notifications and child processes.

/// System clipboard adapter.
pub mod clipboard;
/// Desktop notification adapter.
pub mod notify;
/// External process adapter for actions.
pub mod process;

use std::time::Duration;

/// Errors surfaced by a clipboard adapter.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No connection to the clipboard could be made.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    /// Reading failed for a reason other than "no text".
    #[error("clipboard read failed: {0}")]
    Read(String),
    /// Writing failed.
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Text access to the OS clipboard.
///
/// Not `Send`: some platforms tie the clipboard handle to one thread.
pub trait ClipboardPort {
    /// Current text, `None` when the clipboard holds no text.
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError>;
    /// Replaces the clipboard contents.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Fire-and-forget user notifications.
pub trait Notifier: Send {
    /// Shows a notification; failures are swallowed.
    fn notify(&self, summary: &str, body: &str, timeout: Duration);
}

/// How an action process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit status zero.
    Success,
    /// Non-zero exit code, or `None` when killed by a signal.
    Failed(Option<i32>),
}

/// Runs an argv to completion.
pub trait ProcessRunner {
    /// Spawns `argv[0]` with the remaining arguments and waits for it.
    fn run(&mut self, argv: &[String]) -> std::io::Result<ExitOutcome>;
}
