use tempfile::TempDir;

use clipring::persist::{
    StateBackend, load_ring, sqlite::SqliteBackend, update_persistent, update_ring,
};

#[test]
fn in_memory_ring_and_notes_are_independent() {
    let mut backend = SqliteBackend::open_in_memory().expect("open");
    update_ring(&mut backend, 3, |ring| {
        for t in ["a", "b", "c", "d"] {
            ring.observe(t);
        }
    })
    .expect("observe");
    update_persistent(&mut backend, '#', |s| s.add("note1")).expect("add");

    assert_eq!(backend.read_ring().expect("ring"), ["d", "c", "b"]);
    assert_eq!(backend.read_persistent().expect("notes"), ["note1"]);
}

#[test]
fn file_database_survives_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("clipring.sqlite3");
    {
        let mut backend = SqliteBackend::open(&path).expect("open");
        update_ring(&mut backend, 20, |ring| ring.observe("multi\nline")).expect("observe");
        update_ring(&mut backend, 20, |ring| ring.observe("second")).expect("observe");
    }
    let mut backend = SqliteBackend::open(&path).expect("reopen");
    let ring = load_ring(&mut backend, 20).expect("load");
    assert_eq!(ring.entries(), ["second", "multi\nline"]);
}

#[test]
fn concurrent_connections_serialize_updates() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("clipring.sqlite3");
    let mut daemon = SqliteBackend::open(&path).expect("daemon");
    let mut menu = SqliteBackend::open(&path).expect("menu");

    update_persistent(&mut daemon, '#', |s| s.add("from daemon")).expect("add");
    update_persistent(&mut menu, '#', |s| s.add("from menu")).expect("add");

    assert_eq!(
        daemon.read_persistent().expect("read"),
        ["from daemon", "from menu"]
    );
}

#[test]
fn undecodable_payload_reads_as_empty() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("clipring.sqlite3");
    drop(SqliteBackend::open(&path).expect("create"));

    let conn = rusqlite::Connection::open(&path).expect("raw open");
    conn.execute(
        "INSERT INTO collections(name, ts_ms, payload) VALUES ('ring', 0, ?1)",
        [b"not json".to_vec()],
    )
    .expect("insert");
    conn.execute(
        "INSERT INTO collections(name, ts_ms, payload) VALUES ('persistent', 0, ?1)",
        [br#"{"format_version":99,"entries":["x"]}"#.to_vec()],
    )
    .expect("insert");
    drop(conn);

    let mut backend = SqliteBackend::open(&path).expect("open");
    assert!(backend.read_ring().expect("ring").is_empty());
    assert!(backend.read_persistent().expect("notes").is_empty());

    update_ring(&mut backend, 20, |ring| ring.observe("fresh")).expect("observe");
    assert_eq!(backend.read_ring().expect("ring"), ["fresh"]);
}
