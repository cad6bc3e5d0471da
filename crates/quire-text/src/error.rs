//! Error types for text measurement.

use thiserror::Error;

/// Result type for measurer operations.
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Errors a [`TextMeasurer`](crate::measure::TextMeasurer) may report.
///
/// The layout engine never propagates these; it degrades by measuring a
/// shorter prefix instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The text contains a glyph the backend cannot render.
    #[error("cannot measure glyph {0:?}")]
    Unmeasurable(char),
}
