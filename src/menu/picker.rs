//! Line framing for the external picker and parsing of its answer.

use std::io::{self, Write};

use crate::types::{RowFraming, RowIndex};

/// Separator rofi uses between a row and its hidden info field.
pub const ROFI_INFO_SEP: &str = "\0info\x1f";
/// Environment variable carrying the info field of the selected row.
pub const ROFI_INFO_ENV: &str = "ROFI_INFO";
/// Script-mode option line enabling pango markup in rows.
pub const ROFI_MARKUP_ROWS: &str = "\0markup-rows\x1ftrue";

/// One rendered picker row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuRow {
    pub index: RowIndex,
    pub text: String,
}

pub fn format_row(row: &MenuRow, framing: RowFraming) -> String {
    match framing {
        RowFraming::Rofi => format!("{}{}{}", row.text, ROFI_INFO_SEP, row.index),
        RowFraming::Prefix => format!("{}: {}", row.index, row.text),
        RowFraming::None => row.text.clone(),
    }
}

/// Writes newline-delimited rows. `markup` announces pango rows to rofi.
pub fn write_rows<W: Write>(
    out: &mut W,
    rows: &[MenuRow],
    framing: RowFraming,
    markup: bool,
) -> io::Result<()> {
    if markup && framing == RowFraming::Rofi {
        writeln!(out, "{ROFI_MARKUP_ROWS}")?;
    }
    for row in rows {
        writeln!(out, "{}", format_row(row, framing))?;
    }
    out.flush()
}

/// What the picker handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Row position.
    Index(RowIndex),
    /// Row text, matched against freshly rendered rows.
    Line(String),
    /// A bare number rofi returned without `ROFI_INFO`: a row with exactly
    /// this text wins, otherwise it is a row position.
    TextOrIndex(String, RowIndex),
}

impl Selection {
    /// Interprets the picker's answer under `framing`.
    ///
    /// A `ROFI_INFO` value wins over the argument. Without it a bare integer
    /// is first matched as row text under [`RowFraming::Rofi`], is an index
    /// under [`RowFraming::Prefix`] and is plain text under [`RowFraming::None`].
    pub fn from_picker(framing: RowFraming, rofi_info: Option<&str>, arg: Option<&str>) -> Option<Self> {
        if let Some(index) = rofi_info.and_then(|v| v.trim().parse::<RowIndex>().ok()) {
            return Some(Self::Index(index));
        }
        let arg = arg?.trim_end_matches(['\n', '\r']);
        if arg.is_empty() {
            return None;
        }
        Some(Self::parse(framing, arg))
    }

    pub fn parse(framing: RowFraming, arg: &str) -> Self {
        if framing == RowFraming::None {
            return Self::Line(arg.to_string());
        }
        if let Ok(index) = arg.trim().parse::<RowIndex>() {
            return match framing {
                RowFraming::Rofi => Self::TextOrIndex(arg.to_string(), index),
                _ => Self::Index(index),
            };
        }
        if framing == RowFraming::Prefix {
            if let Some((head, _)) = arg.split_once(": ") {
                if let Ok(index) = head.trim().parse::<RowIndex>() {
                    return Self::Index(index);
                }
            }
        }
        // rofi may echo the row including its info suffix.
        let text = arg.split(ROFI_INFO_SEP).next().unwrap_or(arg);
        Self::Line(text.to_string())
    }

    /// Position of the selected row, or `None` if it no longer exists.
    pub fn resolve(&self, rows: &[MenuRow]) -> Option<RowIndex> {
        match self {
            Self::Index(i) => rows.iter().find(|r| r.index == *i).map(|r| r.index),
            Self::Line(text) => rows.iter().find(|r| &r.text == text).map(|r| r.index),
            Self::TextOrIndex(text, i) => rows
                .iter()
                .find(|r| &r.text == text)
                .or_else(|| rows.iter().find(|r| r.index == *i))
                .map(|r| r.index),
        }
    }
}
