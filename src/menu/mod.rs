//! Picker-facing side: rendering stores as rows and dispatching selections.

/// Named command templates.
pub mod actions;
/// Show/select dispatch over the stores.
pub mod controller;
/// `$EDITOR` round trip for the persistent store.
pub mod editor;
/// Row framing and selection parsing.
pub mod picker;
