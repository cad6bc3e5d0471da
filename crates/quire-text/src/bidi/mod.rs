//! Paragraph direction built on `unicode-bidi`.
//!
//! Layout only needs to know whether a paragraph is right-to-left: it
//! decides the alignment offset of `Auto`-aligned text and the single-line
//! scroll clamp. Reordering and shaping belong to the renderer.

pub mod levels;

pub use levels::{BaseDirection, is_rtl};
