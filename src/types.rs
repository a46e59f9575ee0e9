//! Shared primitive enums for picker modes, row framing, and storage selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Zero-based position of a row in a rendered list.
pub type RowIndex = usize;

/// Which collection a picker invocation operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuMode {
    /// Automatically captured clipboard ring.
    #[default]
    Runtime,
    /// User-curated persistent notes.
    Persistent,
    /// Configured action names.
    Actions,
}

impl MenuMode {
    /// Lowercase name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Persistent => "persistent",
            Self::Actions => "actions",
        }
    }
}

impl fmt::Display for MenuMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "runtime" => Ok(Self::Runtime),
            "persistent" => Ok(Self::Persistent),
            "actions" => Ok(Self::Actions),
            other => Err(format!("unknown menu mode: {other}")),
        }
    }
}

/// How a row carries its index back to us through the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFraming {
    /// rofi script mode: `text\0info\x1f<index>`, returned via `ROFI_INFO`.
    #[default]
    Rofi,
    /// dmenu style: `<index>: text`.
    Prefix,
    /// Bare text; selections are matched by content.
    None,
}

/// Durable storage implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Flat files: binary ring snapshot plus a line-oriented notes file.
    #[default]
    File,
    /// Single SQLite database with transactional read-modify-write.
    Sqlite,
}
