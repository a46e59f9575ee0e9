//! Clip value type and comment annotation helpers.

use serde::{Deserialize, Serialize};

/// One clipboard history entry.
///
/// Only `raw` is stored; the display preview is derived on demand by
/// [`crate::core::preview`]. Equality is exact equality of `raw`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clip {
    /// Text exactly as captured from the clipboard.
    pub raw: String,
}

impl Clip {
    /// Wraps captured text.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Borrowed raw text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Splits the entry at the last free-standing `delimiter` into body and
    /// trailing comment.
    ///
    /// The delimiter only starts a comment when whitespace surrounds it, so
    /// `https://host/#frag` or `#ff0000` carry no comment.
    pub fn split_comment(&self, delimiter: char) -> Option<(&str, &str)> {
        split_comment(&self.raw, delimiter)
    }

    /// Text before the comment delimiter with trailing whitespace trimmed, or
    /// the whole raw text when there is no comment.
    pub fn body(&self, delimiter: char) -> &str {
        match self.split_comment(delimiter) {
            Some((body, _)) => body,
            None => &self.raw,
        }
    }
}

impl From<&str> for Clip {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Clip {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Returns true for text that should never enter a store.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Byte offset of the delimiter that starts the trailing comment of `raw`.
pub(crate) fn comment_start(raw: &str, delimiter: char) -> Option<usize> {
    let mut after: Option<char> = None;
    let mut candidate = None;
    for (idx, ch) in raw.char_indices().rev() {
        if let Some(pos) = candidate.take() {
            if ch.is_whitespace() && !raw[..idx].trim().is_empty() {
                return Some(pos);
            }
        }
        if ch == delimiter && after.is_some_and(char::is_whitespace) {
            candidate = Some(idx);
        }
        after = Some(ch);
    }
    None
}

pub(crate) fn split_comment(raw: &str, delimiter: char) -> Option<(&str, &str)> {
    let idx = comment_start(raw, delimiter)?;
    let body = raw[..idx].trim_end();
    let comment = raw[idx + delimiter.len_utf8()..].trim();
    Some((body, comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_uses_last_delimiter() {
        let clip = Clip::new("echo '#1' # build step");
        assert_eq!(clip.split_comment('#'), Some(("echo '#1'", "build step")));
        assert_eq!(clip.body('#'), "echo '#1'");
    }

    #[test]
    fn delimiter_needs_surrounding_whitespace() {
        assert_eq!(Clip::new("https://example.org/#intro").split_comment('#'), None);
        assert_eq!(Clip::new("#ff0000").split_comment('#'), None);
        assert_eq!(Clip::new("cmd #note").split_comment('#'), None);
        assert_eq!(Clip::new("# heading only").split_comment('#'), None);
        assert_eq!(
            Clip::new("color #ff0000 # red").split_comment('#'),
            Some(("color #ff0000", "red"))
        );
        assert_eq!(
            Clip::new("ls\n# list\tfiles").split_comment('#'),
            Some(("ls", "list\tfiles"))
        );
    }

    #[test]
    fn multibyte_text_around_comment() {
        let clip = Clip::new("grüße ¶ gruß");
        assert_eq!(clip.split_comment('¶'), Some(("grüße", "gruß")));
        assert_eq!(clip.body('#'), "grüße ¶ gruß");
    }
}
