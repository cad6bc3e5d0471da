use bitflags::bitflags;

use super::cursor::Cursor;

bitflags! {
    /// How a visual row ends.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct LineFlags: u8 {
        /// The row ends at an explicit `\n` (not stored in the row).
        const LINEBREAK = 0b01;
        /// The row was split inside a token by wrapping.
        const WORDBREAK = 0b10;
        /// An empty row terminated by `\n`.
        const BLANK = Self::LINEBREAK.bits() | Self::WORDBREAK.bits();
    }
}

/// Visual rows of a text buffer after wrapping.
///
/// Offsets and lengths count chars. There is always at least one row; an
/// empty buffer is a single empty row.
#[derive(Debug, Clone, PartialEq)]
pub struct LineModel {
    lines: Vec<String>,
    flags: Vec<LineFlags>,
    line_starts: Vec<usize>,
    line_lens: Vec<usize>,
    width: f32,
    wrap: bool,
}

impl LineModel {
    /// The model of an empty buffer.
    pub fn empty(width: f32, wrap: bool) -> Self {
        Self {
            lines: vec![String::new()],
            flags: vec![LineFlags::empty()],
            line_starts: vec![0],
            line_lens: vec![0],
            width,
            wrap,
        }
    }

    pub(crate) fn with_capacity(width: f32, wrap: bool, rows: usize) -> Self {
        Self {
            lines: Vec::with_capacity(rows),
            flags: Vec::with_capacity(rows),
            line_starts: Vec::with_capacity(rows),
            line_lens: Vec::with_capacity(rows),
            width,
            wrap,
        }
    }

    pub(crate) fn push(&mut self, line: String, flags: LineFlags, start: usize) {
        self.line_lens.push(line.chars().count());
        self.lines.push(line);
        self.flags.push(flags);
        self.line_starts.push(start);
    }

    /// Keep the first `rows` rows.
    pub(crate) fn truncate(&mut self, rows: usize) {
        self.lines.truncate(rows);
        self.flags.truncate(rows);
        self.line_starts.truncate(rows);
        self.line_lens.truncate(rows);
    }

    /// Append every row of `tail`, shifting its offsets by `base`.
    pub(crate) fn append_shifted(&mut self, tail: LineModel, base: usize) {
        self.lines.extend(tail.lines);
        self.flags.extend(tail.flags);
        self.line_starts
            .extend(tail.line_starts.into_iter().map(|start| start + base));
        self.line_lens.extend(tail.line_lens);
    }

    /// Wrap width the rows were built for, in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Whether rows were word-wrapped (otherwise split only at `\n`).
    pub fn wraps(&self) -> bool {
        self.wrap
    }

    /// Number of rows (at least 1).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; kept for the `len`/`is_empty` convention.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(String::as_str).unwrap_or("")
    }

    /// Length of a row in chars, excluding its newline.
    pub fn line_len(&self, row: usize) -> usize {
        self.line_lens.get(row).copied().unwrap_or(0)
    }

    pub fn flags(&self, row: usize) -> LineFlags {
        self.flags.get(row).copied().unwrap_or_default()
    }

    pub fn all_flags(&self) -> &[LineFlags] {
        &self.flags
    }

    /// Flat offset of the first char of `row`.
    pub fn line_start(&self, row: usize) -> usize {
        match self.line_starts.get(row) {
            Some(start) => *start,
            None => self.text_len(),
        }
    }

    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// Flat offset just past the row's content (its newline excluded).
    pub fn line_end(&self, row: usize) -> usize {
        self.line_start(row) + self.line_len(row)
    }

    /// Length of the source text in chars.
    pub fn text_len(&self) -> usize {
        let last = self.lines.len().saturating_sub(1);
        let end = self.line_starts.get(last).copied().unwrap_or(0)
            + self.line_lens.get(last).copied().unwrap_or(0);
        // The final row never carries a newline.
        end + usize::from(self.flags(last).contains(LineFlags::LINEBREAK))
    }

    /// Row whose start is the greatest start `<= offset`.
    pub fn row_at_offset(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Clamp a cursor onto an existing row and column.
    pub fn clamp(&self, cursor: Cursor) -> Cursor {
        let row = cursor.row.min(self.len() - 1);
        Cursor {
            col: cursor.col.min(self.line_len(row)),
            row,
        }
    }

    /// Rebuild the source text: rows joined, `\n` after each `LINEBREAK` row.
    pub fn reconstruct(&self) -> String {
        let mut text = String::with_capacity(self.lines.iter().map(String::len).sum::<usize>());
        for (line, flags) in self.lines.iter().zip(&self.flags) {
            text.push_str(line);
            if flags.contains(LineFlags::LINEBREAK) {
                text.push('\n');
            }
        }
        text
    }

    /// Whether `text` starts with the text this model was built from.
    pub fn is_prefix_of(&self, text: &str) -> bool {
        let mut rest = text;
        for (line, flags) in self.lines.iter().zip(&self.flags) {
            let Some(after) = rest.strip_prefix(line.as_str()) else {
                return false;
            };
            rest = after;
            if flags.contains(LineFlags::LINEBREAK) {
                let Some(after) = rest.strip_prefix('\n') else {
                    return false;
                };
                rest = after;
            }
        }
        true
    }

    /// Rows as `(text, flags, start)` triples.
    pub fn rows(&self) -> impl Iterator<Item = (&str, LineFlags, usize)> + '_ {
        self.lines
            .iter()
            .zip(&self.flags)
            .zip(&self.line_starts)
            .map(|((line, flags), start)| (line.as_str(), *flags, *start))
    }
}
