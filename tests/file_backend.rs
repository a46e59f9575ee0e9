use tempfile::TempDir;

use clipring::{
    core::ring::Observed,
    persist::{
        PERSISTENT_FILE, RING_FILE, StateBackend, file::FileBackend, load_persistent, load_ring,
        update_persistent, update_ring,
    },
};

#[test]
fn ring_survives_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let mut backend = FileBackend::open(tmp.path()).expect("open");
    for text in ["one", "two\nlines", "three"] {
        update_ring(&mut backend, 20, |ring| ring.observe(text)).expect("observe");
    }

    let mut reopened = FileBackend::open(tmp.path()).expect("reopen");
    assert_eq!(
        reopened.read_ring().expect("read"),
        ["three", "two\nlines", "one"]
    );
}

#[test]
fn ring_file_uses_length_prefixed_records() {
    let tmp = TempDir::new().expect("tmp");
    let mut backend = FileBackend::open(tmp.path()).expect("open");
    update_ring(&mut backend, 20, |ring| ring.observe("hi")).expect("observe");
    let bytes = std::fs::read(tmp.path().join(RING_FILE)).expect("read file");
    assert_eq!(bytes, [0, 0, 0, 2, b'h', b'i']);
}

#[test]
fn unchanged_ring_is_not_rewritten() {
    let tmp = TempDir::new().expect("tmp");
    let mut backend = FileBackend::open(tmp.path()).expect("open");
    let observed = update_ring(&mut backend, 20, |ring| ring.observe("  ")).expect("observe");
    assert_eq!(observed, Observed::Ignored);
    assert!(!backend.ring_path().exists());
}

#[test]
fn truncated_ring_file_keeps_complete_records() {
    let tmp = TempDir::new().expect("tmp");
    let mut bytes = vec![0, 0, 0, 1, b'a', 0, 0, 0, 1, b'b'];
    bytes.extend_from_slice(&[0, 0, 0, 9, b'c']);
    std::fs::write(tmp.path().join(RING_FILE), bytes).expect("write");

    let mut backend = FileBackend::open(tmp.path()).expect("open");
    let ring = load_ring(&mut backend, 20).expect("load");
    assert_eq!(ring.entries(), ["a", "b"]);
}

#[test]
fn corrupt_persistent_lines_are_skipped() {
    let tmp = TempDir::new().expect("tmp");
    let mut bytes = b"first\nbad \\q escape\n\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    bytes.extend_from_slice(b"two\\nlines # note\r\n");
    std::fs::write(tmp.path().join(PERSISTENT_FILE), bytes).expect("write");

    let mut backend = FileBackend::open(tmp.path()).expect("open");
    let store = load_persistent(&mut backend, '#').expect("load");
    assert_eq!(store.entries(), ["first", "two\nlines # note"]);
}

#[test]
fn persistent_edits_are_written_eagerly() {
    let tmp = TempDir::new().expect("tmp");
    let mut backend = FileBackend::open(tmp.path()).expect("open");
    assert!(update_persistent(&mut backend, '#', |s| s.add("path\\to\nthing")).expect("add"));
    assert!(update_persistent(&mut backend, '#', |s| s.add("keep")).expect("add"));

    let text = std::fs::read_to_string(tmp.path().join(PERSISTENT_FILE)).expect("read file");
    assert_eq!(text, "path\\\\to\\nthing\nkeep\n");

    assert!(update_persistent(&mut backend, '#', |s| s.remove("path\\to\nthing")).expect("remove"));
    let mut reopened = FileBackend::open(tmp.path()).expect("reopen");
    assert_eq!(reopened.read_persistent().expect("read"), ["keep"]);
}

#[test]
fn missing_files_read_as_empty() {
    let tmp = TempDir::new().expect("tmp");
    let mut backend = FileBackend::open(tmp.path().join("nested/data")).expect("open");
    assert!(backend.read_ring().expect("ring").is_empty());
    assert!(backend.read_persistent().expect("persistent").is_empty());
}

#[test]
fn two_handles_see_each_others_writes() {
    let tmp = TempDir::new().expect("tmp");
    let mut daemon = FileBackend::open(tmp.path()).expect("daemon");
    let mut menu = FileBackend::open(tmp.path()).expect("menu");

    update_ring(&mut daemon, 5, |ring| ring.observe("a")).expect("observe");
    update_ring(&mut menu, 5, |ring| ring.clear()).expect("clear");
    update_ring(&mut daemon, 5, |ring| ring.observe("b")).expect("observe");

    assert_eq!(menu.read_ring().expect("read"), ["b"]);
}
