//! Clipboard polling loop, its event stream, and the menu handoff socket.

/// Event stream types emitted by the watcher.
pub mod events;
/// Socket handoff between menu invocations and the daemon.
pub mod handoff;
/// Polling loop implementation.
pub mod watcher;
