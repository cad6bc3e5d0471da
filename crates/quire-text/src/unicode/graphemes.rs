use unicode_segmentation::UnicodeSegmentation;

/// Number of chars (Unicode scalar values) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the char at `char_index`, clamped to `text.len()`.
pub fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Slice `text` by char offsets. Out-of-range bounds are clamped.
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end.max(start));
    &text[start_byte..end_byte]
}

/// Column of the grapheme boundary before `col`, or 0 at the line start.
///
/// A `col` inside a cluster snaps to that cluster's start.
pub fn prev_grapheme_col(line: &str, col: usize) -> usize {
    let mut boundary = 0;
    for len in line.graphemes(true).map(char_len) {
        if boundary + len >= col {
            return boundary;
        }
        boundary += len;
    }
    boundary.min(col)
}

/// Greatest grapheme boundary at or before `col`.
pub fn snap_grapheme_col(line: &str, col: usize) -> usize {
    let mut boundary = 0;
    for len in line.graphemes(true).map(char_len) {
        if boundary + len > col {
            return boundary;
        }
        boundary += len;
    }
    boundary
}

/// Column of the grapheme boundary after `col`, clamped to the line length.
pub fn next_grapheme_col(line: &str, col: usize) -> usize {
    let mut boundary = 0;
    for len in line.graphemes(true).map(char_len) {
        boundary += len;
        if boundary > col {
            return boundary;
        }
    }
    boundary
}
