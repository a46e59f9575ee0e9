use proptest::prelude::*;

use clipring::core::preview::{PreviewOptions, is_line_break, render};

fn opts(show_comments_first: bool, colored_comments: bool) -> PreviewOptions {
    PreviewOptions {
        show_comments_first,
        colored_comments,
        ..PreviewOptions::default()
    }
}

#[test]
fn multi_line_clip_collapses_to_one_row() {
    assert_eq!(render("first\nsecond\nthird", 100, "¬"), "first¬ second¬ third");
}

#[test]
fn truncates_to_width_without_indicator() {
    assert_eq!(render("abcdefgh", 5, "¬"), "abcde");
    assert_eq!(render("äöüß", 2, "¬"), "äö");
}

#[test]
fn comment_moves_to_front_when_enabled() {
    let o = opts(true, false);
    assert_eq!(o.render_note("git log --oneline # short log"), "©short log ➜ git log --oneline");
    assert_eq!(o.render_note("no comment here"), "no comment here");
}

#[test]
fn comment_styling_off_renders_raw_entry() {
    let o = opts(false, false);
    assert_eq!(o.render_note("cmd # note"), "cmd # note");
}

#[test]
fn colored_comment_is_muted_and_escaped() {
    let o = opts(false, true);
    assert_eq!(
        o.render_note("a<b # note"),
        "a&lt;b <span alpha=\"50%\"># note</span>"
    );

    let first = opts(true, true);
    assert_eq!(
        first.render_note("cmd # note"),
        "<span alpha=\"50%\">©note</span> ➜ cmd"
    );
}

#[test]
fn url_fragment_is_not_styled_as_a_comment() {
    assert_eq!(
        opts(false, true).render_note("https://example.org/#intro"),
        "https://example.org/#intro"
    );
    assert_eq!(
        opts(true, false).render_note("see https://example.org/#intro # docs"),
        "©docs ➜ see https://example.org/#intro"
    );
}

#[test]
fn colored_plain_entry_is_still_escaped() {
    assert_eq!(opts(false, true).render_note("x & y"), "x &amp; y");
}

#[test]
fn styled_preview_shares_one_width_budget() {
    let o = PreviewOptions {
        max_width: 8,
        ..opts(true, false)
    };
    assert_eq!(o.render_note("cmd # note"), "©note ➜ ");
}

#[test]
fn styling_does_not_touch_the_entry() {
    let raw = "cmd\nline two # note";
    let before = raw.to_string();
    let _ = opts(true, true).render_note(raw);
    assert_eq!(raw, before);
}

proptest! {
    #[test]
    fn render_is_deterministic(raw in any::<String>(), width in 0usize..200) {
        prop_assert_eq!(render(&raw, width, "¬"), render(&raw, width, "¬"));
    }

    #[test]
    fn render_output_has_no_line_breaks(raw in "(.|\n|\r|\u{2028}){0,80}", width in 1usize..120) {
        let out = render(&raw, width, "¬");
        prop_assert!(!out.chars().any(is_line_break));
        prop_assert!(out.chars().count() <= width);
    }
}
