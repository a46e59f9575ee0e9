//! Single-line, width-bounded previews for picker rows.
//!
//! Every function here is pure. Widths are counted in `char`s, including the
//! newline marker and any moved comment prefix; markup tokens added for
//! `colored_comments` are not counted.

use crate::clip::{comment_start, split_comment};

/// Separator placed between a moved comment and the entry body.
pub const COMMENT_ARROW: &str = " ➜ ";
/// Pango token opening a low-emphasis span.
pub const MUTED_OPEN: &str = "<span alpha=\"50%\">";
/// Pango token closing a low-emphasis span.
pub const MUTED_CLOSE: &str = "</span>";

/// Rendering knobs taken from the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Maximum preview length in chars.
    pub max_width: usize,
    /// Marker standing in for each line break.
    pub newline_marker: String,
    /// Prefix shown before a comment moved to the front.
    pub comment_char: String,
    /// Character separating a persistent entry from its trailing comment.
    pub comment_delimiter: char,
    /// Move persistent comments to the front of the row.
    pub show_comments_first: bool,
    /// Emit pango markup that dims persistent comments.
    pub colored_comments: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_width: 100,
            newline_marker: "¬".to_string(),
            comment_char: "©".to_string(),
            comment_delimiter: '#',
            show_comments_first: false,
            colored_comments: false,
        }
    }
}

/// Collapses `raw` to one line and cuts it to `max_width` chars.
///
/// Each line break (CRLF counts once) becomes `newline_marker` plus a space.
pub fn render(raw: &str, max_width: usize, newline_marker: &str) -> String {
    let flat = flatten(raw, newline_marker);
    truncate_chars(&flat, max_width).to_string()
}

/// Longest prefix of `s` with at most `max` chars.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Characters treated as line breaks when flattening.
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Escapes text for pango markup rows.
pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flatten(raw: &str, newline_marker: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
        }
        if is_line_break(c) {
            out.push_str(newline_marker);
            out.push(' ');
        } else if c != '\0' {
            // NUL would end the row in rofi's script protocol.
            out.push(c);
        }
    }
    out
}

struct Segment {
    text: String,
    muted: bool,
}

impl PreviewOptions {
    /// Plain preview of a runtime clip.
    pub fn render(&self, raw: &str) -> String {
        render(raw, self.max_width, &self.newline_marker)
    }

    /// Preview of a persistent entry with comment styling applied.
    ///
    /// Styling only changes the displayed text; the entry itself is untouched.
    pub fn render_note(&self, raw: &str) -> String {
        let styled = self.show_comments_first || self.colored_comments;
        let split = if styled {
            split_comment(raw, self.comment_delimiter)
        } else {
            None
        };

        let Some((body, comment)) = split else {
            let plain = self.render(raw);
            return if self.colored_comments {
                escape_markup(&plain)
            } else {
                plain
            };
        };

        let segments = if self.show_comments_first {
            vec![
                Segment {
                    text: format!(
                        "{}{}",
                        self.comment_char,
                        flatten(comment, &self.newline_marker)
                    ),
                    muted: true,
                },
                Segment {
                    text: COMMENT_ARROW.to_string(),
                    muted: false,
                },
                Segment {
                    text: flatten(body, &self.newline_marker),
                    muted: false,
                },
            ]
        } else {
            // Keep the entry as written, only dim the trailing comment.
            let idx = comment_start(raw, self.comment_delimiter).unwrap_or(raw.len());
            vec![
                Segment {
                    text: flatten(&raw[..idx], &self.newline_marker),
                    muted: false,
                },
                Segment {
                    text: flatten(&raw[idx..], &self.newline_marker),
                    muted: true,
                },
            ]
        };

        self.compose(&segments)
    }

    fn compose(&self, segments: &[Segment]) -> String {
        let mut budget = self.max_width;
        let mut out = String::new();
        for seg in segments {
            if budget == 0 {
                break;
            }
            let piece = truncate_chars(&seg.text, budget);
            budget -= piece.chars().count();
            if piece.is_empty() {
                continue;
            }
            if !self.colored_comments {
                out.push_str(piece);
            } else if seg.muted {
                out.push_str(MUTED_OPEN);
                out.push_str(&escape_markup(piece));
                out.push_str(MUTED_CLOSE);
            } else {
                out.push_str(&escape_markup(piece));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_counts_as_one_break() {
        assert_eq!(render("a\r\nb", 20, "¬"), "a¬ b");
        assert_eq!(render("a\rb\nc", 20, "¬"), "a¬ b¬ c");
    }

    #[test]
    fn truncation_counts_marker_chars() {
        assert_eq!(render("ab\ncd", 4, "¬"), "ab¬ ");
        assert_eq!(render("ab\ncd", 3, "¬"), "ab¬");
        assert_eq!(render("héllo", 0, "¬"), "");
    }

    #[test]
    fn nul_is_dropped() {
        assert_eq!(render("a\0b", 10, "¬"), "ab");
    }
}
