//! Hand-editing the persistent store in `$EDITOR`.

use std::io::Write;
use std::process::Command;

use tracing::{debug, info};

use crate::core::preview::is_line_break;

const DEFAULT_EDITOR: &str = "vi";

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("editor command is empty")]
    NoEditor,
    #[error("failed to prepare the edit buffer: {0}")]
    Buffer(#[source] std::io::Error),
    #[error("failed to start editor `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Editor exited cleanly but nothing changed, or the buffer came back empty.
    Unchanged,
    /// Store replaced; carries the new entry count.
    Replaced(usize),
    /// Editor exited with a failure status.
    Aborted,
}

/// Editor argv from `$VISUAL`/`$EDITOR`-style text, `vi` when unset.
pub fn editor_command(value: Option<&str>) -> Vec<String> {
    let argv: Vec<String> = value
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if argv.is_empty() {
        vec![DEFAULT_EDITOR.to_string()]
    } else {
        argv
    }
}

/// One entry per line, embedded line breaks shown as `marker`.
pub fn to_editor_text(entries: &[String], marker: &str) -> String {
    let mut out = String::new();
    for entry in entries {
        let mut chars = entry.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\r' && chars.peek() == Some(&'\n') {
                continue;
            }
            if is_line_break(c) {
                out.push_str(marker);
            } else {
                out.push(c);
            }
        }
        out.push('\n');
    }
    out
}

/// Inverse of [`to_editor_text`]: blank lines dropped, `marker` back to `\n`.
pub fn from_editor_text(text: &str, marker: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            if marker.is_empty() {
                line.to_string()
            } else {
                line.replace(marker, "\n")
            }
        })
        .collect()
}

/// Runs `argv` on a temporary file holding `text` and returns the edited
/// buffer, or `None` when the editor exits with a failure status.
///
/// The editor inherits the terminal.
pub fn run_editor(argv: &[String], text: &str) -> Result<Option<String>, EditorError> {
    let (program, args) = argv.split_first().ok_or(EditorError::NoEditor)?;
    let mut buffer = tempfile::Builder::new()
        .prefix("clipring-")
        .suffix(".txt")
        .tempfile()
        .map_err(EditorError::Buffer)?;
    buffer
        .write_all(text.as_bytes())
        .and_then(|()| buffer.flush())
        .map_err(EditorError::Buffer)?;

    debug!(program = %program, path = %buffer.path().display(), "launching editor");
    let status = Command::new(program)
        .args(args)
        .arg(buffer.path())
        .status()
        .map_err(|source| EditorError::Spawn {
            program: program.clone(),
            source,
        })?;
    if !status.success() {
        info!(code = ?status.code(), "editor aborted, store left as is");
        return Ok(None);
    }
    // Read by path: many editors save by renaming a new file into place.
    std::fs::read_to_string(buffer.path())
        .map(Some)
        .map_err(EditorError::Buffer)
}
