//! Property tests for wrapping, cursor mapping and incremental reflow.

use proptest::prelude::*;
use quire_text::{
    LineFlags, Metrics, MonospaceMeasurer, TextStyle, cursor_to_index, index_to_cursor, reflow,
    reflow_incremental,
};
use unicode_segmentation::UnicodeSegmentation;

fn metrics() -> Metrics {
    Metrics::new(MonospaceMeasurer::new(10.0, 20.0), TextStyle::default())
}

/// Short texts mixing words, spaces, newlines and a combining mark.
fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => "[a-e]{1,9}",
            2 => Just(" ".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("e\u{0301}".to_string()),
            1 => Just(".".to_string()),
        ],
        0..30,
    )
    .prop_map(|parts| parts.concat())
}

/// Wrap widths in whole glyph advances.
fn width() -> impl Strategy<Value = f32> {
    (1u32..9).prop_map(|glyphs| glyphs as f32 * 10.0)
}

proptest! {
    #[test]
    fn prop_rows_reconstruct_text(text in text(), width in width(), wrap in any::<bool>()) {
        let model = reflow(&text, width, wrap, &mut metrics());
        prop_assert_eq!(model.reconstruct(), text.clone());
        prop_assert_eq!(model.text_len(), text.chars().count());
        prop_assert!(!model.is_empty());
    }

    #[test]
    fn prop_row_offsets_are_contiguous(text in text(), width in width()) {
        let model = reflow(&text, width, true, &mut metrics());
        for row in 1..model.len() {
            let gap = usize::from(model.flags(row - 1).contains(LineFlags::LINEBREAK));
            prop_assert_eq!(model.line_start(row), model.line_end(row - 1) + gap);
        }
    }

    #[test]
    fn prop_index_cursor_round_trip(text in text(), width in width()) {
        let model = reflow(&text, width, true, &mut metrics());
        for index in 0..=model.text_len() {
            let cursor = index_to_cursor(index, &model);
            prop_assert!(cursor.col <= model.line_len(cursor.row));
            prop_assert_eq!(cursor_to_index(cursor, &model), index);
        }
    }

    #[test]
    fn prop_every_cursor_maps_to_its_index(text in text(), width in width()) {
        let model = reflow(&text, width, true, &mut metrics());
        for row in 0..model.len() {
            for col in 0..=model.line_len(row) {
                let cursor = quire_text::Cursor::new(col, row);
                let index = cursor_to_index(cursor, &model);
                prop_assert_eq!(index, model.line_start(row) + col);
                prop_assert_eq!(cursor_to_index(index_to_cursor(index, &model), &model), index);
            }
        }
    }

    #[test]
    fn prop_rows_fit_the_width(text in text(), width in width()) {
        let mut metrics = metrics();
        let model = reflow(&text, width, true, &mut metrics);
        for line in model.lines() {
            let visible = line.trim_end_matches([' ', '\t', '\r']);
            let single = visible.graphemes(true).count() <= 1;
            prop_assert!(single || metrics.width(visible) <= width, "row {:?} overflows {}", line, width);
        }
    }

    #[test]
    fn prop_reflow_is_idempotent(text in text(), width in width()) {
        let mut metrics = metrics();
        let model = reflow(&text, width, true, &mut metrics);
        let again = reflow(&model.reconstruct(), width, true, &mut metrics);
        prop_assert_eq!(again, model);
    }

    #[test]
    fn prop_incremental_matches_full(
        text in text(),
        suffix in text(),
        width in width(),
    ) {
        let mut metrics = metrics();
        let old = reflow(&text, width, true, &mut metrics);
        let appended = format!("{text}{suffix}");
        let outcome = reflow_incremental(old, &appended, &mut metrics);
        prop_assert_eq!(outcome.model, reflow(&appended, width, true, &mut metrics));
    }

    #[test]
    fn prop_line_edits_patch_parallel_rows(
        text in text(),
        suffix in text(),
        width in width(),
    ) {
        let mut metrics = metrics();
        let old = reflow(&text, width, true, &mut metrics);
        let mut parallel: Vec<String> = old.lines().to_vec();
        let appended = format!("{text}{suffix}");
        let outcome = reflow_incremental(old, &appended, &mut metrics);
        let model = &outcome.model;
        quire_text::layout::apply_line_edits(&mut parallel, &outcome.edits, |row| model.line(row).to_string());
        prop_assert_eq!(parallel.as_slice(), model.lines());
    }
}
