//! In-memory stores and the preview transform.

/// Persistent notes collection.
pub mod persistent;
/// Preview rendering for picker rows.
pub mod preview;
/// Bounded clipboard history ring.
pub mod ring;
