//! Clipboard history ring with user-curated persistent notes, driven by an
//! external line picker such as rofi or dmenu.
//!
//! # Examples
//!
//! In-memory ring with [`core::ring::HistoryStore`]:
//! ```
//! use clipring::core::ring::HistoryStore;
//!
//! let mut ring = HistoryStore::new(3);
//! for text in ["a", "b", "c", "d"] {
//!     ring.observe(text);
//! }
//! let raw: Vec<&str> = ring.iter().map(|clip| clip.as_str()).collect();
//! assert_eq!(raw, ["d", "c", "b"]);
//! ```
//!
//! Rendering a picker row:
//! ```
//! use clipring::core::preview::render;
//!
//! assert_eq!(render("first\nsecond", 100, "¬"), "first¬ second");
//! ```
//!
//! Running the watcher against the stored ring:
//! ```no_run
//! use clipring::{
//!     config::Config,
//!     persist::open_backend,
//!     ports::{clipboard::SystemClipboard, notify::SilentNotifier},
//!     runtime::watcher::{Watcher, WatcherConfig},
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::load(None)?;
//! let backend = open_backend(config.settings.backend, &config.paths.data_dir)?;
//! let watcher = Watcher::new(
//!     Box::new(SystemClipboard::new()),
//!     backend,
//!     Box::new(SilentNotifier),
//!     WatcherConfig::from_settings(&config.settings),
//! );
//! watcher.run(None, async { let _ = tokio::signal::ctrl_c().await; }).await;
//! # Ok(())
//! # }
//! ```

/// Clip value type.
pub mod clip;
/// Settings file and resolved paths.
pub mod config;
/// History ring, persistent store and preview rendering.
pub mod core;
/// Picker protocol, actions and the menu controller.
pub mod menu;
/// Durable backends for both collections.
pub mod persist;
/// Clipboard, notification and process collaborators.
pub mod ports;
/// Polling loop and daemon handoff.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
