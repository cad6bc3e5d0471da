use super::line_model::LineModel;

/// A cursor as a column within a visual row.
///
/// `col` counts chars from the start of row `row`; `col == line_len` is
/// the position after the last char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    pub col: usize,
    pub row: usize,
}

impl Cursor {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// First row whose content end is at or after `index`.
///
/// An index on a soft wrap resolves to the earlier row; an index on a
/// `\n` resolves to the row the newline terminates.
pub fn row_for_index(model: &LineModel, index: usize) -> usize {
    let (mut lo, mut hi) = (0, model.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if model.line_end(mid) < index {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo.min(model.len() - 1)
}

/// Map a flat char offset to a cursor. Out-of-range offsets clamp to the
/// end of the text.
pub fn index_to_cursor(index: usize, model: &LineModel) -> Cursor {
    let index = index.min(model.text_len());
    let row = row_for_index(model, index);
    let col = index.saturating_sub(model.line_start(row));
    Cursor::new(col.min(model.line_len(row)), row)
}

/// Map a cursor to a flat char offset. The cursor is clamped first; the
/// newline ending its own row is never counted.
pub fn cursor_to_index(cursor: Cursor, model: &LineModel) -> usize {
    let cursor = model.clamp(cursor);
    model.line_start(cursor.row) + cursor.col
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::line_model::LineFlags;
    use crate::layout::reflow::reflow;
    use crate::measure::{Metrics, MonospaceMeasurer, TextStyle};

    fn layout(text: &str, width: f32) -> LineModel {
        let mut metrics = Metrics::new(MonospaceMeasurer::new(10.0, 20.0), TextStyle::default());
        reflow(text, width, true, &mut metrics)
    }

    #[test]
    fn empty_buffer_maps_to_origin() {
        let model = layout("", 50.0);
        assert_eq!(index_to_cursor(0, &model), Cursor::new(0, 0));
        assert_eq!(index_to_cursor(7, &model), Cursor::new(0, 0));
        assert_eq!(cursor_to_index(Cursor::new(3, 3), &model), 0);
    }

    #[test]
    fn hard_breaks_skip_the_newline() {
        let model = layout("ab\ncd", 50.0);
        assert_eq!(index_to_cursor(2, &model), Cursor::new(2, 0));
        assert_eq!(index_to_cursor(3, &model), Cursor::new(0, 1));
        assert_eq!(index_to_cursor(5, &model), Cursor::new(2, 1));
        assert_eq!(cursor_to_index(Cursor::new(2, 0), &model), 2);
        assert_eq!(cursor_to_index(Cursor::new(0, 1), &model), 3);
    }

    #[test]
    fn soft_wrap_maps_upstream() {
        let model = layout("hello world", 50.0);
        assert_eq!(model.flags(0), LineFlags::empty());
        assert_eq!(index_to_cursor(6, &model), Cursor::new(6, 0));
        assert_eq!(index_to_cursor(7, &model), Cursor::new(1, 1));
        // (0, 1) aliases the end of row 0.
        assert_eq!(cursor_to_index(Cursor::new(0, 1), &model), 6);
    }

    #[test]
    fn trailing_newline_has_its_own_row() {
        let model = layout("ab\n", 50.0);
        assert_eq!(index_to_cursor(3, &model), Cursor::new(0, 1));
        assert_eq!(cursor_to_index(Cursor::new(0, 1), &model), 3);
    }

    #[test]
    fn clamps_out_of_range() {
        let model = layout("ab\ncd", 50.0);
        assert_eq!(index_to_cursor(99, &model), Cursor::new(2, 1));
        assert_eq!(cursor_to_index(Cursor::new(99, 0), &model), 2);
        assert_eq!(cursor_to_index(Cursor::new(0, 99), &model), 3);
    }

    #[test]
    fn every_index_round_trips() {
        let text = "one two\n\nthreefourfive six\n";
        let model = layout(text, 40.0);
        for index in 0..=text.chars().count() {
            let cursor = index_to_cursor(index, &model);
            assert_eq!(cursor_to_index(cursor, &model), index, "index {index}");
        }
    }
}
