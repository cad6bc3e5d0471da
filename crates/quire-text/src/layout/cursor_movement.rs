use super::cursor::{Cursor, cursor_to_index, index_to_cursor};
use super::line_breaker::{next_word_start, prev_word_start};
use super::line_model::{LineFlags, LineModel};
use crate::unicode::{next_grapheme_col, prev_grapheme_col, snap_grapheme_col};

/// Keyboard cursor actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorAction {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Inputs for one movement step.
#[derive(Debug, Clone, Copy)]
pub struct MovementContext<'a> {
    pub text: &'a str,
    pub model: &'a LineModel,
    /// Rows moved by page up/down.
    pub page_rows: usize,
    /// Bounds of a finished, non-empty selection.
    pub selection: Option<(usize, usize)>,
}

/// Cursor movement over visual rows.
pub struct CursorMovement;

impl CursorMovement {
    /// Apply `action` to `cursor`.
    ///
    /// With `control`, left/right move by word and home/end go to the
    /// document edges. Control+up/down scroll instead of moving and return
    /// `None`.
    pub fn apply(
        ctx: &MovementContext<'_>,
        cursor: Cursor,
        action: CursorAction,
        control: bool,
    ) -> Option<Cursor> {
        let model = ctx.model;
        let cursor = model.clamp(cursor);

        if let Some((lo, hi)) = ctx.selection {
            match action {
                CursorAction::Left => return Some(index_to_cursor(lo, model)),
                CursorAction::Right => return Some(index_to_cursor(hi, model)),
                _ => {}
            }
        }

        let moved = match action {
            CursorAction::Left if control => {
                let index = prev_word_start(ctx.text, cursor_to_index(cursor, model));
                index_to_cursor(index, model)
            }
            CursorAction::Right if control => {
                let index = next_word_start(ctx.text, cursor_to_index(cursor, model));
                index_to_cursor(index, model)
            }
            CursorAction::Left => Self::left(model, cursor),
            CursorAction::Right => Self::right(model, cursor),
            CursorAction::Up | CursorAction::Down if control => return None,
            CursorAction::Up => Self::to_row(model, cursor, cursor.row.saturating_sub(1)),
            CursorAction::Down => Self::to_row(model, cursor, cursor.row + 1),
            CursorAction::PageUp => {
                Self::to_row(model, cursor, cursor.row.saturating_sub(ctx.page_rows))
            }
            CursorAction::PageDown => Self::to_row(model, cursor, cursor.row + ctx.page_rows),
            CursorAction::Home => Cursor::new(0, if control { 0 } else { cursor.row }),
            CursorAction::End => {
                let row = if control { model.len() - 1 } else { cursor.row };
                Cursor::new(model.line_len(row), row)
            }
        };
        Some(moved)
    }

    /// One grapheme left, onto the previous row at the row start. Leaving
    /// a soft-wrapped row skips the aliased position.
    pub fn left(model: &LineModel, cursor: Cursor) -> Cursor {
        if cursor.col > 0 {
            return Cursor::new(prev_grapheme_col(model.line(cursor.row), cursor.col), cursor.row);
        }
        if cursor.row == 0 {
            return cursor;
        }
        let row = cursor.row - 1;
        let len = model.line_len(row);
        if model.flags(row).contains(LineFlags::LINEBREAK) {
            Cursor::new(len, row)
        } else {
            Cursor::new(prev_grapheme_col(model.line(row), len), row)
        }
    }

    /// One grapheme right, onto the next row at the row end.
    pub fn right(model: &LineModel, cursor: Cursor) -> Cursor {
        let len = model.line_len(cursor.row);
        if cursor.col < len {
            return Cursor::new(next_grapheme_col(model.line(cursor.row), cursor.col), cursor.row);
        }
        if cursor.row + 1 >= model.len() {
            return cursor;
        }
        let row = cursor.row + 1;
        if model.flags(cursor.row).contains(LineFlags::LINEBREAK) {
            Cursor::new(0, row)
        } else {
            Cursor::new(next_grapheme_col(model.line(row), 0), row)
        }
    }

    /// Same column on `row` (clamped), snapped to a grapheme boundary.
    pub fn to_row(model: &LineModel, cursor: Cursor, row: usize) -> Cursor {
        let row = row.min(model.len() - 1);
        let col = cursor.col.min(model.line_len(row));
        Cursor::new(snap_grapheme_col(model.line(row), col), row)
    }
}

/// Rows that fit in a page, less one for context. At least one.
pub fn page_rows(viewport_height: f32, row_pitch: f32) -> usize {
    if row_pitch <= 0.0 {
        return 1;
    }
    ((viewport_height / row_pitch) as usize).saturating_sub(1).max(1)
}
