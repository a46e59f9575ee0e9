pub mod codec;
pub mod file;
pub mod sqlite;

use std::path::{Path, PathBuf};

use crate::{
    core::{persistent::PersistentStore, ring::HistoryStore},
    types::BackendKind,
};

/// Snapshot of the clipboard ring inside the data directory.
pub const RING_FILE: &str = "ring.db";
/// Line-oriented persistent notes inside the data directory.
pub const PERSISTENT_FILE: &str = "persistent.db";
/// Database used by [`BackendKind::Sqlite`].
pub const SQLITE_FILE: &str = "clipring.sqlite3";

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("payload encoding error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

impl PersistError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Callback handed the freshly loaded entries; returns true if it changed them.
pub type Mutator<'a> = &'a mut dyn FnMut(&mut Vec<String>) -> bool;

/// Durable home of the ring and persistent collections.
///
/// Every `with_*` call is one scoped read-modify-write: load the current
/// on-disk entries, let the callback mutate them, write back only when the
/// callback reports a change. Backends differ in how much mutual exclusion
/// they give across processes; see each implementation.
pub trait StateBackend: Send {
    fn read_ring(&mut self) -> PersistResult<Vec<String>>;
    fn read_persistent(&mut self) -> PersistResult<Vec<String>>;
    fn with_ring(&mut self, f: Mutator<'_>) -> PersistResult<bool>;
    fn with_persistent(&mut self, f: Mutator<'_>) -> PersistResult<bool>;
}

/// Opens the configured backend rooted at `data_dir`, creating it if needed.
pub fn open_backend(kind: BackendKind, data_dir: &Path) -> PersistResult<Box<dyn StateBackend>> {
    match kind {
        BackendKind::File => Ok(Box::new(file::FileBackend::open(data_dir)?)),
        BackendKind::Sqlite => {
            std::fs::create_dir_all(data_dir).map_err(|e| PersistError::io(data_dir, e))?;
            Ok(Box::new(sqlite::SqliteBackend::open(data_dir.join(SQLITE_FILE))?))
        }
    }
}

/// Loads the ring as currently stored.
pub fn load_ring(backend: &mut dyn StateBackend, ring_size: usize) -> PersistResult<HistoryStore> {
    Ok(HistoryStore::from_entries(ring_size, backend.read_ring()?))
}

/// Loads the persistent store as currently stored.
pub fn load_persistent(
    backend: &mut dyn StateBackend,
    delimiter: char,
) -> PersistResult<PersistentStore> {
    Ok(PersistentStore::from_entries(delimiter, backend.read_persistent()?))
}

/// Runs `f` against a fresh copy of the stored ring and writes the result
/// back if the entries differ afterwards.
pub fn update_ring<T>(
    backend: &mut dyn StateBackend,
    ring_size: usize,
    f: impl FnOnce(&mut HistoryStore) -> T,
) -> PersistResult<T> {
    let mut f = Some(f);
    let mut out = None;
    backend.with_ring(&mut |entries| {
        let original = std::mem::take(entries);
        let mut ring = HistoryStore::from_entries(ring_size, original.iter().cloned());
        if let Some(f) = f.take() {
            out = Some(f(&mut ring));
        }
        *entries = ring.into_entries();
        *entries != original
    })?;
    out.ok_or_else(|| PersistError::Message("ring mutator was not invoked".to_string()))
}

/// Persistent-store counterpart of [`update_ring`].
pub fn update_persistent<T>(
    backend: &mut dyn StateBackend,
    delimiter: char,
    f: impl FnOnce(&mut PersistentStore) -> T,
) -> PersistResult<T> {
    let mut f = Some(f);
    let mut out = None;
    backend.with_persistent(&mut |entries| {
        let original = std::mem::take(entries);
        let mut store = PersistentStore::from_entries(delimiter, original.iter().cloned());
        if let Some(f) = f.take() {
            out = Some(f(&mut store));
        }
        *entries = store.into_entries();
        *entries != original
    })?;
    out.ok_or_else(|| PersistError::Message("persistent mutator was not invoked".to_string()))
}
