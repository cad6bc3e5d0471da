pub mod cursor;
pub mod cursor_movement;
pub mod line_breaker;
pub mod line_model;
pub mod reflow;
pub mod selection;
pub mod undo;
pub mod viewport;

pub use cursor::{Cursor, cursor_to_index, index_to_cursor};
pub use cursor_movement::{CursorAction, CursorMovement, MovementContext};
pub use line_breaker::{Token, WORD_DELIMITERS, WRAP_DELIMITERS, tokenize};
pub use line_model::{LineFlags, LineModel};
pub use reflow::{LineEdit, ReflowOutcome, apply_line_edits, reflow, reflow_incremental};
pub use selection::{Selection, SelectionSpan, expand_to_row_block, expand_to_word, expand_word_at};
pub use undo::{EditOperation, UndoStack};
pub use viewport::{Alignment, Viewport};
