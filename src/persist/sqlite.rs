//! SQLite-backed collections with transactional read-modify-write.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Mutator, PersistResult, StateBackend};

const COLLECTION_FORMAT_VERSION: u16 = 1;
const RING: &str = "ring";
const PERSISTENT: &str = "persistent";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionEnvelope {
    format_version: u16,
    entries: Vec<String>,
}

/// SQLite implementation of [`crate::persist::StateBackend`].
///
/// Each `with_*` call holds an IMMEDIATE transaction for the whole
/// read-modify-write, so the daemon and menu invocations serialize on the
/// database lock instead of racing.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens or creates a database at `path`.
    ///
    /// Enables WAL mode and waits up to two seconds for a competing writer.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(Duration::from_secs(2))?;
        Ok(Self { conn })
    }

    fn read_collection(&mut self, name: &str) -> PersistResult<Vec<String>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM collections WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(decode_payload(name, payload))
    }

    fn modify_collection(&mut self, name: &str, f: Mutator<'_>) -> PersistResult<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let payload: Option<Vec<u8>> = tx
            .query_row(
                "SELECT payload FROM collections WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        let mut entries = decode_payload(name, payload);

        if !f(&mut entries) {
            tx.commit()?;
            return Ok(false);
        }

        write_collection(&tx, name, entries)?;
        tx.commit()?;
        debug!(collection = name, "collection written");
        Ok(true)
    }
}

impl StateBackend for SqliteBackend {
    fn read_ring(&mut self) -> PersistResult<Vec<String>> {
        self.read_collection(RING)
    }

    fn read_persistent(&mut self) -> PersistResult<Vec<String>> {
        self.read_collection(PERSISTENT)
    }

    fn with_ring(&mut self, f: Mutator<'_>) -> PersistResult<bool> {
        self.modify_collection(RING, f)
    }

    fn with_persistent(&mut self, f: Mutator<'_>) -> PersistResult<bool> {
        self.modify_collection(PERSISTENT, f)
    }
}

fn write_collection(tx: &Transaction<'_>, name: &str, entries: Vec<String>) -> PersistResult<()> {
    let env = CollectionEnvelope {
        format_version: COLLECTION_FORMAT_VERSION,
        entries,
    };
    let payload = serde_json::to_vec(&env)?;
    tx.execute(
        "INSERT INTO collections(name, ts_ms, payload) VALUES (?1, ?2, ?3)
         ON CONFLICT(name) DO UPDATE SET ts_ms = excluded.ts_ms, payload = excluded.payload",
        params![name, now_ms() as i64, payload],
    )?;
    Ok(())
}

/// Unreadable payloads degrade to an empty collection.
fn decode_payload(name: &str, payload: Option<Vec<u8>>) -> Vec<String> {
    let Some(payload) = payload else {
        return Vec::new();
    };
    match serde_json::from_slice::<CollectionEnvelope>(&payload) {
        Ok(env) if env.format_version == COLLECTION_FORMAT_VERSION => env.entries,
        Ok(env) => {
            warn!(
                collection = name,
                version = env.format_version,
                "unsupported collection format, starting empty"
            );
            Vec::new()
        }
        Err(err) => {
            warn!(collection = name, %err, "undecodable collection payload, starting empty");
            Vec::new()
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
