use proptest::prelude::*;

use clipring::core::persistent::PersistentStore;

fn raw(store: &PersistentStore) -> Vec<String> {
    store.entries()
}

#[test]
fn add_then_remove_single_note() {
    let mut store = PersistentStore::new('#');
    assert!(store.add("note1"));
    assert_eq!(raw(&store), ["note1"]);
    assert!(store.remove("note1"));
    assert!(store.is_empty());
}

#[test]
fn duplicate_add_is_a_no_op() {
    let mut store = PersistentStore::new('#');
    assert!(store.add("x"));
    assert!(!store.add("x"));
    assert!(!store.add("   "));
    assert_eq!(store.len(), 1);
}

#[test]
fn identity_is_the_whole_entry_comment_included() {
    let mut store = PersistentStore::from_entries('#', ["ssh prod-01 # jump host".to_string()]);
    assert!(!store.contains("ssh prod-01"));
    assert!(!store.remove("ssh prod-01"));
    assert!(store.add("ssh prod-01"));
    assert_eq!(raw(&store), ["ssh prod-01 # jump host", "ssh prod-01"]);
    assert!(store.remove("ssh prod-01 # jump host"));
    assert_eq!(raw(&store), ["ssh prod-01"]);
}

#[test]
fn url_fragment_note_is_not_touched_by_its_base_url() {
    let mut store = PersistentStore::from_entries('#', ["https://example.org/#intro".to_string()]);
    assert!(store.add("https://example.org/"));
    assert!(store.remove("https://example.org/"));
    assert_eq!(raw(&store), ["https://example.org/#intro"]);
    assert_eq!(store.list()[0].comment, None);
}

#[test]
fn duplicate_entries_from_disk_are_removed_one_at_a_time() {
    let mut store = PersistentStore::from_entries('#', ["cmd".to_string(), "cmd".to_string()]);
    assert!(store.remove("cmd"));
    assert_eq!(raw(&store), ["cmd"]);
}

#[test]
fn removing_absent_text_changes_nothing() {
    let mut store = PersistentStore::from_entries('#', ["a".to_string()]);
    assert!(!store.remove("b"));
    assert_eq!(raw(&store), ["a"]);
}

#[test]
fn list_exposes_comments_in_storage_order() {
    let store = PersistentStore::from_entries(
        '#',
        [
            "plain".to_string(),
            "color #ff0000 # red".to_string(),
            "".to_string(),
            "#ff0000".to_string(),
        ],
    );
    let notes = store.list();
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0].body, "plain");
    assert_eq!(notes[0].comment, None);
    assert_eq!(notes[1].body, "color #ff0000");
    assert_eq!(notes[1].comment, Some("red"));
    assert_eq!(notes[1].clip.raw, "color #ff0000 # red");
    assert_eq!(notes[2].body, "#ff0000");
    assert_eq!(notes[2].comment, None);
}

#[test]
fn replace_all_drops_blank_lines() {
    let mut store = PersistentStore::from_entries('#', ["old".to_string()]);
    store.replace_all(["new".to_string(), " ".to_string(), "other".to_string()]);
    assert_eq!(raw(&store), ["new", "other"]);
}

proptest! {
    #[test]
    fn add_then_remove_restores_prior_content(
        existing in prop::collection::vec("[a-c#/ ]{1,6}", 0..10),
        text in "[a-c#/ ]{1,6}",
    ) {
        let mut store = PersistentStore::from_entries('#', existing);
        let before = store.entries();
        let present = before.contains(&text);
        let added = store.add(&text);
        prop_assert_eq!(added, !present && !text.trim().is_empty());
        if added {
            prop_assert!(store.remove(&text));
            prop_assert_eq!(store.entries(), before);
        }
    }

    #[test]
    fn removing_text_only_drops_an_identical_entry(
        existing in prop::collection::vec("[a-c#/ ]{1,6}", 0..10),
        text in "[a-c#/ ]{1,6}",
    ) {
        let mut store = PersistentStore::from_entries('#', existing);
        let mut before = store.entries();
        if store.remove(&text) {
            let pos = before.iter().position(|e| *e == text);
            prop_assert!(pos.is_some());
            if let Some(pos) = pos {
                before.remove(pos);
            }
        }
        prop_assert_eq!(store.entries(), before);
    }
}
