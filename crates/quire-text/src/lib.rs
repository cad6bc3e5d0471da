//! quire-text: text layout, cursor and selection engine for editable
//! text boxes.
//!
//! - `measure`: the [`TextMeasurer`] seam, width cache and degradation on
//!   measurement failure
//! - `layout`: word wrapping into a [`LineModel`], incremental reflow,
//!   cursor mapping, selection, viewport and undo history
//! - `text_box`: the [`TextBox`] facade tying them together

pub mod bidi;
pub mod error;
pub mod layout;
pub mod measure;
pub mod text_box;
pub mod unicode;

pub use bidi::BaseDirection;
pub use error::{MeasureError, Result};
pub use layout::{
    Alignment, Cursor, CursorAction, EditOperation, LineEdit, LineFlags, LineModel, ReflowOutcome,
    Selection, SelectionSpan, UndoStack, Viewport, cursor_to_index, expand_to_row_block,
    expand_to_word, index_to_cursor, reflow, reflow_incremental,
};
pub use measure::{Extent, Metrics, MonospaceMeasurer, TextMeasurer, TextStyle, WidthCache};
pub use text_box::{TextBox, TextBoxOptions};
