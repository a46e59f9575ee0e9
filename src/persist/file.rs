//! Flat-file backend.
//!
//! Writes are atomic (temp file + rename) so readers never see a torn file,
//! but there is no lock: a concurrent daemon write and menu write race and
//! the last writer wins.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::{Mutator, PERSISTENT_FILE, PersistError, PersistResult, RING_FILE, StateBackend, codec};

pub struct FileBackend {
    ring_path: PathBuf,
    persistent_path: PathBuf,
}

impl FileBackend {
    /// Uses `dir/ring.db` and `dir/persistent.db`, creating `dir` if missing.
    pub fn open(dir: impl AsRef<Path>) -> PersistResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;
        Ok(Self {
            ring_path: dir.join(RING_FILE),
            persistent_path: dir.join(PERSISTENT_FILE),
        })
    }

    pub fn ring_path(&self) -> &Path {
        &self.ring_path
    }

    pub fn persistent_path(&self) -> &Path {
        &self.persistent_path
    }
}

impl StateBackend for FileBackend {
    fn read_ring(&mut self) -> PersistResult<Vec<String>> {
        Ok(codec::decode_ring(&read_or_empty(&self.ring_path)?))
    }

    fn read_persistent(&mut self) -> PersistResult<Vec<String>> {
        Ok(codec::decode_notes(&read_or_empty(&self.persistent_path)?))
    }

    fn with_ring(&mut self, f: Mutator<'_>) -> PersistResult<bool> {
        let mut entries = self.read_ring()?;
        if !f(&mut entries) {
            return Ok(false);
        }
        let bytes = codec::encode_ring(entries.iter().map(String::as_str));
        write_atomic(&self.ring_path, &bytes)?;
        debug!(entries = entries.len(), path = %self.ring_path.display(), "ring written");
        Ok(true)
    }

    fn with_persistent(&mut self, f: Mutator<'_>) -> PersistResult<bool> {
        let mut entries = self.read_persistent()?;
        if !f(&mut entries) {
            return Ok(false);
        }
        let text = codec::encode_notes(entries.iter().map(String::as_str));
        write_atomic(&self.persistent_path, text.as_bytes())?;
        debug!(entries = entries.len(), path = %self.persistent_path.display(), "persistent store written");
        Ok(true)
    }
}

fn read_or_empty(path: &Path) -> PersistResult<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(PersistError::io(path, err)),
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> PersistResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| PersistError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PersistError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| PersistError::io(path, e.error))?;
    Ok(())
}
