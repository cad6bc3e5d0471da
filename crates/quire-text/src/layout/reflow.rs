use core::ops::Range;

use hashbrown::HashMap;
use similar::{Algorithm, DiffTag, capture_diff_slices};
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use super::cursor::row_for_index;
use super::line_breaker::{Token, fit_text, tokenize};
use super::line_model::{LineFlags, LineModel};
use crate::measure::Metrics;
use crate::unicode::byte_offset;

/// One non-equal run of a line diff.
///
/// `old` indexes rows of the previous model and `new` rows of the updated
/// one. Edits are ordered top to bottom and do not overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    pub old: Range<usize>,
    pub new: Range<usize>,
}

/// Result of re-flowing after a text change.
#[derive(Debug, Clone)]
pub struct ReflowOutcome {
    pub model: LineModel,
    /// Rows to replace in anything kept parallel to the previous model.
    pub edits: Vec<LineEdit>,
    /// Whether only the tail was re-wrapped.
    pub incremental: bool,
}

/// Apply `edits` to a vector kept parallel to the old rows.
///
/// `make` builds the entry for a row index of the new model.
pub fn apply_line_edits<T>(rows: &mut Vec<T>, edits: &[LineEdit], mut make: impl FnMut(usize) -> T) {
    // Back to front so earlier `old` ranges stay valid.
    for edit in edits.iter().rev() {
        let fresh: Vec<T> = edit.new.clone().map(&mut make).collect();
        let old = edit.old.start.min(rows.len())..edit.old.end.min(rows.len());
        rows.splice(old, fresh);
    }
}

/// Lay out `text` into visual rows.
///
/// Without `wrap` rows are split only at `\n`. With `wrap` tokens are
/// packed greedily into rows of at most `width` pixels; tokens wider than
/// a row are split between grapheme clusters unless `width < 1`.
pub fn reflow(text: &str, width: f32, wrap: bool, metrics: &mut Metrics) -> LineModel {
    if wrap {
        Wrapper::new(width, metrics).run(text)
    } else {
        split_lines(text, width)
    }
}

fn split_lines(text: &str, width: f32) -> LineModel {
    let mut model = LineModel::with_capacity(width, false, text.matches('\n').count() + 1);
    let mut start = 0;
    let mut parts = text.split('\n').peekable();
    while let Some(line) = parts.next() {
        let flags = if parts.peek().is_none() {
            LineFlags::empty()
        } else if line.is_empty() {
            LineFlags::BLANK
        } else {
            LineFlags::LINEBREAK
        };
        model.push(line.to_owned(), flags, start);
        start = model.line_end(model.len() - 1) + 1;
    }
    model
}

/// Greedy word wrapper state for one pass.
struct Wrapper<'a, 'm> {
    width: f32,
    metrics: &'m mut Metrics,
    /// Widths of tokens and graphemes seen in this pass.
    memo: HashMap<&'a str, f32>,
    model: LineModel,
    line: String,
    line_start: usize,
    x: f32,
}

impl<'a, 'm> Wrapper<'a, 'm> {
    fn new(width: f32, metrics: &'m mut Metrics) -> Self {
        Self {
            width,
            metrics,
            memo: HashMap::new(),
            model: LineModel::with_capacity(width, true, 1),
            line: String::new(),
            line_start: 0,
            x: 0.0,
        }
    }

    fn measure(&mut self, text: &'a str) -> f32 {
        if let Some(width) = self.memo.get(text) {
            return *width;
        }
        let width = self.metrics.width(text);
        self.memo.insert(text, width);
        width
    }

    fn flush(&mut self, flags: LineFlags, next_start: usize) {
        let line = core::mem::take(&mut self.line);
        self.model.push(line, flags, self.line_start);
        self.line_start = next_start;
        self.x = 0.0;
    }

    fn run(mut self, text: &'a str) -> LineModel {
        for token in tokenize(text) {
            if token.is_newline() {
                let flags = if self.line.is_empty() {
                    LineFlags::BLANK
                } else {
                    LineFlags::LINEBREAK
                };
                self.flush(flags, token.start + 1);
                continue;
            }

            let fit = self.measure(token.fit_text());
            if !self.line.is_empty() && self.x + fit > self.width {
                self.flush(LineFlags::empty(), token.start);
            }

            if self.width >= 1.0 && fit > self.width {
                self.split(token);
            } else {
                self.line.push_str(token.text);
                self.x += self.measure(token.text);
            }
        }
        self.flush(LineFlags::empty(), 0);
        self.model
    }

    /// Break an over-wide token into `WORDBREAK` rows. The last piece
    /// stays on the current row.
    fn split(&mut self, token: Token<'a>) {
        let mut rest = token.text;
        let mut start = token.start;

        loop {
            let fit_part = fit_text(rest);
            if self.measure(fit_part) <= self.width {
                break;
            }
            let graphemes: Vec<&'a str> = fit_part.graphemes(true).collect();
            if graphemes.len() < 2 {
                break;
            }

            // At least one grapheme per piece; at least one left over.
            let mut used = 0.0;
            let mut count = 0;
            let mut bytes = 0;
            for &grapheme in &graphemes[..graphemes.len() - 1] {
                let advance = self.measure(grapheme);
                if count > 0 && used + advance > self.width {
                    break;
                }
                used += advance;
                count += 1;
                bytes += grapheme.len();
            }

            let piece = &rest[..bytes];
            let piece_len = piece.chars().count();
            self.line.push_str(piece);
            self.flush(LineFlags::WORDBREAK, start + piece_len);
            rest = &rest[bytes..];
            start += piece_len;
        }

        self.line.push_str(rest);
        self.x = self.measure(rest);
    }
}

/// Re-flow after text was appended to the text `old` was built from.
///
/// Rows before the one preceding the old end are kept; the rest is
/// re-wrapped and diffed against the old tail. Falls back to a full reflow
/// when `new_text` does not extend the old text or `old` has a single row.
pub fn reflow_incremental(old: LineModel, new_text: &str, metrics: &mut Metrics) -> ReflowOutcome {
    let (width, wrap) = (old.width(), old.wraps());
    if old.len() < 2 || !old.is_prefix_of(new_text) {
        trace!(rows = old.len(), "not an append, reflowing fully");
        return full_reflow(&old, new_text, width, wrap, metrics);
    }

    let restart = row_for_index(&old, old.text_len()).saturating_sub(1);
    let base = old.line_start(restart);
    let tail = reflow(&new_text[byte_offset(new_text, base)..], width, wrap, metrics);

    let edits = {
        let old_rows: Vec<(&str, LineFlags)> = (restart..old.len())
            .map(|row| (old.line(row), old.flags(row)))
            .collect();
        let new_rows: Vec<(&str, LineFlags)> = tail.rows().map(|(line, flags, _)| (line, flags)).collect();
        capture_diff_slices(Algorithm::Myers, &old_rows, &new_rows)
            .iter()
            .filter_map(|op| {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                (tag != DiffTag::Equal).then(|| LineEdit {
                    old: old_range.start + restart..old_range.end + restart,
                    new: new_range.start + restart..new_range.end + restart,
                })
            })
            .collect::<Vec<_>>()
    };
    trace!(restart, tail_rows = tail.len(), edits = edits.len(), "incremental reflow");

    let mut model = old;
    model.truncate(restart);
    model.append_shifted(tail, base);
    ReflowOutcome {
        model,
        edits,
        incremental: true,
    }
}

/// Full reflow reported as a single edit replacing every row of `old`.
pub fn full_reflow(old: &LineModel, text: &str, width: f32, wrap: bool, metrics: &mut Metrics) -> ReflowOutcome {
    let model = reflow(text, width, wrap, metrics);
    debug!(rows = model.len(), width, wrap, "full reflow");
    let edits = vec![LineEdit {
        old: 0..old.len(),
        new: 0..model.len(),
    }];
    ReflowOutcome {
        model,
        edits,
        incremental: false,
    }
}
