//! On-disk encodings for the file backend.
//!
//! Ring: repeated `[u32 BE length][UTF-8 bytes]` records, most-recent-first.
//! Notes: one entry per line with `\\`, `\n`, `\r` escapes.

use tracing::warn;

const LEN_PREFIX: usize = 4;

pub fn encode_ring<'a, I>(entries: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::new();
    for raw in entries {
        let bytes = raw.as_bytes();
        let Ok(len) = u32::try_from(bytes.len()) else {
            warn!(len = bytes.len(), "clip too large for ring snapshot, skipped");
            continue;
        };
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(bytes);
    }
    out
}

/// Decodes ring records; invalid UTF-8 records are skipped and a truncated
/// tail ends decoding with the records read so far.
pub fn decode_ring(bytes: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        if rest.len() < LEN_PREFIX {
            warn!(trailing = rest.len(), "truncated ring record header");
            break;
        }
        let (head, tail) = rest.split_at(LEN_PREFIX);
        let len = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
        if tail.len() < len {
            warn!(expected = len, available = tail.len(), "truncated ring record");
            break;
        }
        let (body, next) = tail.split_at(len);
        match String::from_utf8(body.to_vec()) {
            Ok(s) => out.push(s),
            Err(err) => warn!(%err, "skipping ring record with invalid utf-8"),
        }
        rest = next;
    }
    out
}

pub fn encode_notes<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for raw in entries {
        out.push_str(&escape_line(raw));
        out.push('\n');
    }
    out
}

/// Decodes note lines. Blank lines are ignored; lines with invalid UTF-8 or
/// a malformed escape are skipped.
pub fn decode_notes(bytes: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    for (lineno, line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let Ok(text) = std::str::from_utf8(line) else {
            warn!(line = lineno + 1, "skipping persistent entry with invalid utf-8");
            continue;
        };
        match unescape_line(text) {
            Some(raw) => out.push(raw),
            None => warn!(line = lineno + 1, "skipping persistent entry with bad escape"),
        }
    }
    out
}

fn escape_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_line(line: &str) -> Option<String> {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_layout_matches_length_prefixed_records() {
        let bytes = encode_ring(["ab", "é"]);
        assert_eq!(bytes, vec![0, 0, 0, 2, b'a', b'b', 0, 0, 0, 2, 0xc3, 0xa9]);
        assert_eq!(decode_ring(&bytes), vec!["ab".to_string(), "é".to_string()]);
    }

    #[test]
    fn truncated_tail_keeps_prefix() {
        let mut bytes = encode_ring(["one", "two"]);
        bytes.truncate(bytes.len() - 1);
        assert_eq!(decode_ring(&bytes), vec!["one".to_string()]);
        assert_eq!(decode_ring(&[0, 0]), Vec::<String>::new());
    }

    #[test]
    fn invalid_utf8_record_is_skipped() {
        let mut bytes = vec![0, 0, 0, 1, 0xff];
        bytes.extend(encode_ring(["ok"]));
        assert_eq!(decode_ring(&bytes), vec!["ok".to_string()]);
    }

    #[test]
    fn notes_escape_line_breaks_and_backslashes() {
        let text = encode_notes(["a\nb", "c\\n", "d\r\ne"]);
        assert_eq!(text, "a\\nb\nc\\\\n\nd\\r\\ne\n");
        assert_eq!(
            decode_notes(text.as_bytes()),
            vec!["a\nb".to_string(), "c\\n".to_string(), "d\r\ne".to_string()]
        );
    }

    #[test]
    fn bad_note_lines_are_skipped() {
        let bytes = b"good\nbad \\q escape\n\xff\xfe\n\ntrailing\\";
        assert_eq!(decode_notes(bytes), vec!["good".to_string()]);
    }
}
