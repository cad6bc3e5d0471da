use core::ops::Range;

use super::cursor::{Cursor, index_to_cursor};
use super::line_breaker::word_span;
use super::line_model::{LineFlags, LineModel};
use crate::measure::Metrics;
use crate::unicode::char_slice;

/// A selection between two flat char offsets.
///
/// `anchor` is where the selection started and `active` the end being
/// moved; they may be in any order. A selection is *dragging* while the
/// pointer extends it and *finished* once committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    anchor: usize,
    active: usize,
    dragging: bool,
    finished: bool,
}

impl Selection {
    /// A collapsed, finished selection at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            active: offset,
            dragging: false,
            finished: true,
        }
    }

    /// Start or update a drag from `anchor` to `extent`.
    pub fn set(&mut self, anchor: usize, extent: usize) {
        self.anchor = anchor;
        self.active = extent;
        self.dragging = true;
        self.finished = false;
    }

    /// Move the active end, keeping the anchor.
    pub fn extend_to(&mut self, offset: usize) {
        self.active = offset;
    }

    /// Commit the current range.
    pub fn finish(&mut self) {
        self.dragging = false;
        self.finished = true;
    }

    /// Select `start..end` programmatically, clamped to `text_len`.
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    pub fn select(&mut self, start: usize, end: usize, text_len: usize) {
        assert!(end >= start, "selection end {end} is before start {start}");
        self.anchor = start.min(text_len);
        self.active = end.min(text_len);
        self.dragging = false;
        self.finished = true;
    }

    /// Drop the selection, leaving a collapsed one at `at`.
    pub fn cancel(&mut self, at: usize) {
        *self = Self::collapsed(at);
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Ordered bounds.
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.active)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.active
    }

    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Whether anything should be drawn: always while dragging, otherwise
    /// only for a non-empty finished range.
    pub fn is_highlighted(&self) -> bool {
        self.dragging || (self.finished && !self.is_collapsed())
    }

    /// Bounds of a finished, non-empty selection.
    pub fn committed(&self) -> Option<(usize, usize)> {
        (self.finished && !self.is_collapsed()).then(|| (self.start(), self.end()))
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.range().contains(&offset)
    }

    /// Selected text of a finished selection.
    pub fn selected_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        self.committed()
            .map(|(start, end)| char_slice(source, start, end))
    }

    /// Clamp both ends to `text_len`.
    pub fn clamp(&mut self, text_len: usize) {
        self.anchor = self.anchor.min(text_len);
        self.active = self.active.min(text_len);
    }

    /// Highlight spans per row, in row-local pixels.
    ///
    /// The first row starts at the width of the text before the selection,
    /// the last row ends at the width of the text before the selection
    /// end, rows in between use their full width. Empty spans are dropped.
    pub fn per_line_spans(&self, model: &LineModel, metrics: &mut Metrics) -> Vec<SelectionSpan> {
        let (lo, hi) = (self.start(), self.end());
        if lo >= hi {
            return Vec::new();
        }
        let first = index_to_cursor(lo, model);
        let last = index_to_cursor(hi, model);

        let mut spans = Vec::with_capacity(last.row - first.row + 1);
        for row in first.row..=last.row {
            let line = model.line(row);
            let px_start = if row == first.row {
                metrics.width(char_slice(line, 0, first.col))
            } else {
                0.0
            };
            let px_end = if row == last.row {
                metrics.width(char_slice(line, 0, last.col))
            } else {
                metrics.width(line)
            };
            if px_end > px_start {
                spans.push(SelectionSpan {
                    row,
                    px_start,
                    px_end,
                });
            }
        }
        spans
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::collapsed(0)
    }
}

/// Highlighted horizontal extent of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSpan {
    pub row: usize,
    pub px_start: f32,
    pub px_end: f32,
}

impl SelectionSpan {
    pub fn width(&self) -> f32 {
        self.px_end - self.px_start
    }
}

/// Flat range of the word around `index`.
pub fn expand_to_word(model: &LineModel, index: usize, delimiters: &str) -> (usize, usize) {
    expand_word_at(model, index_to_cursor(index, model), delimiters)
}

/// Flat range of the word around a visual `cursor`, within its row.
///
/// At the end of a soft-wrapped row with no word there, the word starting
/// the next row is used.
pub fn expand_word_at(model: &LineModel, cursor: Cursor, delimiters: &str) -> (usize, usize) {
    let cursor = model.clamp(cursor);
    let (start, end) = word_span(model.line(cursor.row), cursor.col, delimiters);
    let soft_end = cursor.col == model.line_len(cursor.row)
        && !model.flags(cursor.row).contains(LineFlags::LINEBREAK)
        && cursor.row + 1 < model.len();
    if start == end && soft_end {
        return expand_word_at(model, Cursor::new(0, cursor.row + 1), delimiters);
    }
    let base = model.line_start(cursor.row);
    (base + start, base + end)
}

/// Flat range of the logical paragraph holding `index`: every soft-wrapped
/// row around it, up to but excluding the terminating newline.
pub fn expand_to_row_block(model: &LineModel, index: usize) -> (usize, usize) {
    let row = index_to_cursor(index, model).row;
    let ends_hard = |row: usize| model.flags(row).contains(LineFlags::LINEBREAK);

    let mut first = row;
    while first > 0 && !ends_hard(first - 1) {
        first -= 1;
    }
    let mut last = row;
    while last + 1 < model.len() && !ends_hard(last) {
        last += 1;
    }
    (model.line_start(first), model.line_end(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::line_breaker::WORD_DELIMITERS;
    use crate::layout::reflow::reflow;
    use crate::measure::{MonospaceMeasurer, TextStyle};

    fn metrics() -> Metrics {
        Metrics::new(MonospaceMeasurer::new(10.0, 20.0), TextStyle::default())
    }

    fn layout(text: &str) -> LineModel {
        reflow(text, 50.0, true, &mut metrics())
    }

    #[test]
    fn drag_then_finish() {
        let mut sel = Selection::default();
        sel.set(8, 3);
        assert!(sel.is_dragging());
        assert!(sel.is_highlighted());
        assert_eq!(sel.committed(), None);
        sel.finish();
        assert_eq!(sel.range(), 3..8);
        assert_eq!(sel.committed(), Some((3, 8)));
    }

    #[test]
    fn empty_finished_selection_is_not_highlighted() {
        let mut sel = Selection::default();
        sel.set(4, 4);
        sel.finish();
        assert!(!sel.is_highlighted());
        assert_eq!(sel.selected_text("abcdef"), None);
    }

    #[test]
    fn select_clamps_and_extracts_text() {
        let mut sel = Selection::default();
        sel.select(2, 99, 6);
        assert_eq!(sel.range(), 2..6);
        assert_eq!(sel.selected_text("añcdef"), Some("cdef"));
        sel.cancel(1);
        assert!(!sel.is_highlighted());
        assert_eq!(sel.range(), 1..1);
    }

    #[test]
    #[should_panic(expected = "before start")]
    fn select_rejects_inverted_bounds() {
        Selection::default().select(5, 2, 10);
    }

    #[test]
    fn spans_cover_each_row() {
        // Rows: "hello " | "world " | "again"
        let model = layout("hello world again");
        let mut m = metrics();
        let mut sel = Selection::default();
        sel.select(2, 14, 17);
        let spans = sel.per_line_spans(&model, &mut m);
        assert_eq!(
            spans,
            vec![
                SelectionSpan { row: 0, px_start: 20.0, px_end: 60.0 },
                SelectionSpan { row: 1, px_start: 0.0, px_end: 60.0 },
                SelectionSpan { row: 2, px_start: 0.0, px_end: 20.0 },
            ]
        );
    }

    #[test]
    fn collapsed_range_has_no_spans() {
        let model = layout("hello");
        let mut sel = Selection::default();
        sel.select(2, 2, 5);
        assert!(sel.per_line_spans(&model, &mut metrics()).is_empty());
    }

    #[test]
    fn span_starting_on_soft_wrap_skips_empty_row() {
        let model = layout("hello world");
        let mut sel = Selection::default();
        sel.select(6, 8, 11);
        let spans = sel.per_line_spans(&model, &mut metrics());
        assert_eq!(spans, vec![SelectionSpan { row: 1, px_start: 0.0, px_end: 20.0 }]);
    }

    #[test]
    fn word_expansion_stays_in_row() {
        let model = layout("ab (cd)\nxy");
        assert_eq!(expand_to_word(&model, 5, WORD_DELIMITERS), (4, 6));
        assert_eq!(expand_to_word(&model, 0, WORD_DELIMITERS), (0, 2));
        assert_eq!(expand_to_word(&model, 9, WORD_DELIMITERS), (8, 10));
    }

    #[test]
    fn word_expansion_at_soft_wrap_takes_next_word() {
        // Rows: "hello " | "world"
        let model = layout("hello world");
        assert_eq!(expand_to_word(&model, 6, WORD_DELIMITERS), (6, 11));
        assert_eq!(expand_word_at(&model, Cursor::new(0, 1), WORD_DELIMITERS), (6, 11));
        assert_eq!(expand_word_at(&model, Cursor::new(3, 0), WORD_DELIMITERS), (0, 5));

        // A forced split keeps the word piece on the earlier row.
        let model = layout("abcdefgh");
        assert_eq!(expand_to_word(&model, 5, WORD_DELIMITERS), (0, 5));
    }

    #[test]
    fn row_block_covers_wrapped_paragraph() {
        // Rows: "aaaa " | "bbbb " | "cc" (LINEBREAK) | "next"
        let model = layout("aaaa bbbb cc\nnext");
        assert_eq!(model.len(), 4);
        assert_eq!(expand_to_row_block(&model, 7), (0, 12));
        assert_eq!(expand_to_row_block(&model, 0), (0, 12));
        assert_eq!(expand_to_row_block(&model, 15), (13, 17));
    }
}
