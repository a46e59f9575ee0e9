use crate::clip::{Clip, is_blank};

/// One persistent entry together with its parsed annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note<'a> {
    /// Stored entry.
    pub clip: &'a Clip,
    /// Text before the comment delimiter, or the whole entry.
    pub body: &'a str,
    /// Trailing comment, if any.
    pub comment: Option<&'a str>,
}

/// Unbounded, insertion-ordered collection of user-curated clips.
#[derive(Debug, Clone)]
pub struct PersistentStore {
    entries: Vec<Clip>,
    delimiter: char,
}

impl PersistentStore {
    /// Empty store using `delimiter` to separate trailing comments.
    pub fn new(delimiter: char) -> Self {
        Self {
            entries: Vec::new(),
            delimiter,
        }
    }

    /// Rebuilds a store from stored raw strings in storage order.
    ///
    /// Blank lines are skipped; duplicates are kept as written so a
    /// hand-edited file is not silently rewritten.
    pub fn from_entries<I>(delimiter: char, entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            entries: entries
                .into_iter()
                .filter(|raw| !is_blank(raw))
                .map(Clip::new)
                .collect(),
            delimiter,
        }
    }

    /// Appends `text` unless an entry with the same raw text exists. Returns
    /// true when added.
    ///
    /// Identity is the whole raw text, comment included.
    pub fn add(&mut self, text: &str) -> bool {
        if is_blank(text) || self.contains(text) {
            return false;
        }
        self.entries.push(Clip::new(text));
        true
    }

    /// Removes the first entry whose raw text equals `text`. Returns true when
    /// something was removed.
    pub fn remove(&mut self, text: &str) -> bool {
        match self.entries.iter().position(|c| c.raw == text) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// True when some entry's raw text equals `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|c| c.raw == text)
    }

    /// Entries in storage order with their annotations.
    pub fn list(&self) -> Vec<Note<'_>> {
        self.entries
            .iter()
            .map(|clip| match clip.split_comment(self.delimiter) {
                Some((body, comment)) => Note {
                    clip,
                    body,
                    comment: Some(comment),
                },
                None => Note {
                    clip,
                    body: clip.as_str(),
                    comment: None,
                },
            })
            .collect()
    }

    /// Entry at `index` in storage order.
    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.entries.get(index)
    }

    /// Replaces all entries, e.g. after an editor session.
    pub fn replace_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entries = entries
            .into_iter()
            .filter(|raw| !is_blank(raw))
            .map(Clip::new)
            .collect();
    }

    /// Comment delimiter in use.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw strings in storage order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().map(|c| c.raw.clone()).collect()
    }

    /// Consumes the store into raw strings in storage order.
    pub fn into_entries(self) -> Vec<String> {
        self.entries.into_iter().map(|c| c.raw).collect()
    }
}
