//! Unicode utilities for quire-text.
//!
//! Flat indices and cursor columns are counted in Unicode scalar values;
//! these helpers translate them to byte offsets and keep cursor steps and
//! forced line splits on extended grapheme cluster boundaries.

pub mod graphemes;

pub use graphemes::{
    byte_offset, char_len, char_slice, next_grapheme_col, prev_grapheme_col,
    snap_grapheme_col,
};
