use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::{
    clip::{Clip, is_blank},
    persist::codec,
};

/// Result of feeding one clipboard sample into the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// Empty or whitespace-only text; nothing happened.
    Ignored,
    /// Text already sits at the front.
    Unchanged,
    /// Existing entry moved to the front.
    Promoted,
    /// New entry inserted at the front, `evicted` entries dropped from the back.
    Inserted {
        /// Number of oldest entries removed to stay within `ring_size`.
        evicted: usize,
    },
}

impl Observed {
    /// True when the ring's content or order changed.
    pub fn changed(self) -> bool {
        matches!(self, Self::Promoted | Self::Inserted { .. })
    }
}

/// Bounded most-recent-first clip history with dedup-and-promote.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<Clip>,
    members: HashSet<String>,
    ring_size: usize,
}

impl HistoryStore {
    /// Empty ring holding at most `ring_size` clips (at least one).
    pub fn new(ring_size: usize) -> Self {
        let ring_size = ring_size.max(1);
        Self {
            entries: VecDeque::with_capacity(ring_size.min(1024)),
            members: HashSet::new(),
            ring_size,
        }
    }

    /// Rebuilds a ring from stored raw strings, most-recent-first.
    ///
    /// Blank strings and later duplicates are dropped and the result is cut
    /// to `ring_size`, so a snapshot written under a larger limit still loads.
    pub fn from_entries<I>(ring_size: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut store = Self::new(ring_size);
        for raw in entries {
            if store.entries.len() >= store.ring_size {
                break;
            }
            if is_blank(&raw) || store.members.contains(raw.as_str()) {
                continue;
            }
            store.members.insert(raw.clone());
            store.entries.push_back(Clip::new(raw));
        }
        store
    }

    /// Decodes a snapshot produced by [`HistoryStore::snapshot`].
    ///
    /// Corrupt records are skipped; a truncated tail keeps what decoded.
    pub fn load(bytes: &[u8], ring_size: usize) -> Self {
        Self::from_entries(ring_size, codec::decode_ring(bytes))
    }

    /// Serializes the full ordered sequence of raw strings.
    pub fn snapshot(&self) -> Vec<u8> {
        codec::encode_ring(self.entries.iter().map(Clip::as_str))
    }

    /// Records a clipboard sample.
    pub fn observe(&mut self, text: &str) -> Observed {
        if is_blank(text) {
            return Observed::Ignored;
        }

        if self.members.contains(text) {
            if self.entries.front().is_some_and(|c| c.raw == text) {
                return Observed::Unchanged;
            }
            if let Some(pos) = self.entries.iter().position(|c| c.raw == text) {
                if let Some(clip) = self.entries.remove(pos) {
                    self.entries.push_front(clip);
                }
            }
            return Observed::Promoted;
        }

        self.members.insert(text.to_string());
        self.entries.push_front(Clip::new(text));

        let mut evicted = 0;
        while self.entries.len() > self.ring_size {
            if let Some(old) = self.entries.pop_back() {
                self.members.remove(old.raw.as_str());
                evicted += 1;
            }
        }
        Observed::Inserted { evicted }
    }

    /// Clips in recency order.
    pub fn list(&self) -> Vec<&Clip> {
        self.entries.iter().collect()
    }

    /// Iterator over clips in recency order.
    pub fn iter(&self) -> impl Iterator<Item = &Clip> {
        self.entries.iter()
    }

    /// Clip at `index` (0 = most recent).
    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.entries.get(index)
    }

    /// Most recent clip.
    pub fn front(&self) -> Option<&Clip> {
        self.entries.front()
    }

    /// True when a clip with exactly this raw text is present.
    pub fn contains(&self, text: &str) -> bool {
        self.members.contains(text)
    }

    /// Drops every clip.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.members.clear();
    }

    /// Number of clips held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no clips are held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured bound.
    pub fn ring_size(&self) -> usize {
        self.ring_size
    }

    /// Raw strings in recency order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().map(|c| c.raw.clone()).collect()
    }

    /// Consumes the ring into raw strings in recency order.
    pub fn into_entries(self) -> Vec<String> {
        self.entries.into_iter().map(|c| c.raw).collect()
    }
}
