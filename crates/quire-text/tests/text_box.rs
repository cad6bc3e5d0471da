//! End-to-end editing scenarios through the `TextBox` facade.

use quire_config::{HAlign, QuireConfig};
use quire_text::{
    Cursor, CursorAction, LineEdit, LineFlags, MonospaceMeasurer, TextBox, TextBoxOptions, TextStyle,
};

/// 10px glyphs, 20px rows and a 50x100 text area without padding.
fn text_box_with(options: TextBoxOptions) -> TextBox {
    TextBox::new(MonospaceMeasurer::new(10.0, 20.0), TextStyle::default(), options, (50.0, 100.0))
}

fn text_box() -> TextBox {
    text_box_with(TextBoxOptions {
        padding: [0.0; 4],
        halign: HAlign::Left,
        ..TextBoxOptions::default()
    })
}

fn rows(text_box: &TextBox) -> Vec<(String, LineFlags)> {
    text_box
        .line_model()
        .rows()
        .map(|(line, flags, _)| (line.to_string(), flags))
        .collect()
}

#[test]
fn wraps_at_whitespace() {
    let mut tb = text_box();
    tb.insert("hello world");
    tb.flush();
    assert_eq!(
        rows(&tb),
        vec![
            ("hello ".to_string(), LineFlags::empty()),
            ("world".to_string(), LineFlags::empty()),
        ]
    );
}

#[test]
fn no_wrap_splits_only_at_newlines() {
    let mut tb = text_box_with(TextBoxOptions {
        wrap: false,
        padding: [0.0; 4],
        ..TextBoxOptions::default()
    });
    tb.insert("ab\ncd");
    tb.flush();
    assert_eq!(
        rows(&tb),
        vec![
            ("ab".to_string(), LineFlags::LINEBREAK),
            ("cd".to_string(), LineFlags::empty()),
        ]
    );
}

#[test]
fn long_words_break_between_graphemes() {
    let mut tb = text_box();
    tb.insert("abcdefgh");
    tb.flush();
    assert_eq!(
        rows(&tb),
        vec![
            ("abcde".to_string(), LineFlags::WORDBREAK),
            ("fgh".to_string(), LineFlags::empty()),
        ]
    );
}

#[test]
fn empty_selection_has_no_spans() {
    let mut tb = text_box();
    tb.insert("hello world");
    tb.select_text(2, 2);
    assert!(!tb.selection().is_highlighted());
    assert!(tb.selection_spans().is_empty());
}

#[test]
fn triple_tap_selects_the_whole_paragraph() {
    let mut tb = text_box();
    tb.insert("aaaa bbbb cccc\nz");
    tb.flush();
    assert_eq!(tb.line_model().len(), 4);
    assert_eq!(tb.expand_to_row_block(7), (0, 14));

    tb.set_cursor_index(7);
    tb.select_row_block_at_cursor();
    assert_eq!(tb.selected_text(), Some("aaaa bbbb cccc"));
}

#[test]
fn soft_wrap_position_maps_upstream() {
    let mut tb = text_box();
    tb.insert("hello world");
    tb.set_cursor_index(6);
    assert_eq!(tb.cursor(), Cursor::new(6, 0));
    assert_eq!(tb.cursor_to_index(Cursor::new(0, 1)), 6);

    tb.move_cursor(CursorAction::Right, false, false);
    assert_eq!(tb.cursor_index(), 7);
    assert_eq!(tb.cursor(), Cursor::new(1, 1));
}

#[test]
fn appending_reports_only_the_changed_rows() {
    let mut tb = text_box();
    tb.insert("1\n2\n3\n4\n5");
    tb.flush();
    tb.take_line_edits();

    tb.insert("9");
    tb.flush();
    assert_eq!(tb.take_line_edits(), vec![LineEdit { old: 4..5, new: 4..5 }]);
    assert_eq!(tb.line_model().line(4), "59");
}

#[test]
fn page_moves_scroll_the_viewport() {
    let mut tb = text_box();
    tb.insert("0\n1\n2\n3\n4\n5\n6\n7\n8\n9");
    tb.set_cursor_index(0);
    assert_eq!(tb.viewport_scroll(), (0.0, 0.0));

    tb.move_cursor(CursorAction::PageDown, false, false);
    assert_eq!(tb.cursor(), Cursor::new(0, 4));
    assert_eq!(tb.viewport_scroll().1, 0.0);

    tb.move_cursor(CursorAction::PageDown, false, false);
    assert_eq!(tb.cursor(), Cursor::new(0, 8));
    assert_eq!(tb.viewport_scroll().1, 80.0);
    assert_eq!(tb.visible_line_range(), 4..9);

    // Control+down scrolls without moving the cursor.
    tb.move_cursor(CursorAction::Down, true, false);
    assert_eq!(tb.cursor(), Cursor::new(0, 8));
    assert_eq!(tb.viewport_scroll().1, 100.0);
}

#[test]
fn unmeasurable_text_still_lays_out() {
    let mut tb = TextBox::new(
        MonospaceMeasurer::new(10.0, 20.0).with_unmeasurable('\u{2603}'),
        TextStyle::default(),
        TextBoxOptions {
            padding: [0.0; 4],
            ..TextBoxOptions::default()
        },
        (50.0, 100.0),
    );
    tb.insert("ab\u{2603}cd efg");
    tb.flush();
    assert_eq!(tb.line_model().reconstruct(), "ab\u{2603}cd efg");
    assert_eq!(tb.cursor_index(), 9);
}

#[test]
fn set_text_drops_history_and_selection() {
    let mut tb = text_box();
    tb.insert("draft");
    tb.select_all();
    tb.set_text("final");
    assert!(!tb.can_undo());
    assert!(!tb.selection().is_highlighted());
    assert_eq!(tb.text(), "final");
}

#[test]
fn configured_text_box() {
    let config = QuireConfig::from_toml_str(
        r#"
        [layout]
        padding = [0.0, 0.0, 0.0, 0.0]

        [history]
        undo_limit = 2
        group_typing = false
        "#,
    )
    .unwrap();
    let mut tb = TextBox::from_config(MonospaceMeasurer::new(10.0, 20.0), &config, (50.0, 100.0));
    assert_eq!(tb.options().halign, HAlign::Auto);

    tb.insert("a");
    tb.insert("b");
    tb.insert("c");
    assert!(tb.undo());
    assert!(tb.undo());
    assert_eq!(tb.text(), "a");
    assert!(!tb.undo());
}

#[test]
fn right_to_left_text_aligns_right() {
    let config = QuireConfig::from_toml_str("[layout]\npadding = [0.0, 0.0, 0.0, 0.0]").unwrap();
    let mut tb = TextBox::from_config(MonospaceMeasurer::new(10.0, 20.0), &config, (50.0, 100.0));
    tb.insert("\u{05e9}\u{05dc}\u{05d5}\u{05dd}");
    tb.flush();
    assert!(tb.is_rtl());
    assert_eq!(tb.row_width(0), 40.0);
    assert_eq!(tb.cursor_pixel_position(), (50.0, 0.0));
}
