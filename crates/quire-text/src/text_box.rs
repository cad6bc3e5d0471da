//! The editable text box: buffer, layout, cursor, selection and scrolling.

use quire_config::{HAlign, QuireConfig};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::bidi::{self, BaseDirection};
use crate::layout::cursor::{self, Cursor};
use crate::layout::cursor_movement::{self, CursorAction, CursorMovement, MovementContext};
use crate::layout::line_model::LineModel;
use crate::layout::reflow::{LineEdit, apply_line_edits, full_reflow, reflow_incremental};
use crate::layout::selection::{self, Selection, SelectionSpan};
use crate::layout::undo::{EditOperation, UndoStack};
use crate::layout::viewport::{Alignment, Viewport};
use crate::layout::WORD_DELIMITERS;
use crate::measure::{Metrics, TextMeasurer, TextStyle, WidthCache};
use crate::unicode::{byte_offset, char_len, char_slice};

/// Layout options of a [`TextBox`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextBoxOptions {
    /// Accept `\n` and show several rows.
    pub multiline: bool,
    /// Word-wrap rows to the viewport width (multiline only).
    pub wrap: bool,
    pub halign: HAlign,
    pub base_direction: BaseDirection,
    /// `[left, top, right, bottom]` in pixels.
    pub padding: [f32; 4],
    /// Fixed row height; measured from the style when `None`.
    pub line_height: Option<f32>,
    pub line_spacing: f32,
    /// Characters that bound a word for [`TextBox::select_word_at_cursor`].
    pub word_delimiters: String,
}

impl TextBoxOptions {
    pub fn from_config(config: &QuireConfig) -> Self {
        Self {
            multiline: config.layout.multiline,
            wrap: config.layout.wrap,
            halign: config.layout.halign,
            base_direction: config.layout.base_direction.into(),
            padding: config.layout.padding,
            line_height: config.text.line_height,
            line_spacing: config.text.line_spacing,
            word_delimiters: config.layout.word_delimiters.clone(),
        }
    }

    fn wraps(&self) -> bool {
        self.multiline && self.wrap
    }
}

impl Default for TextBoxOptions {
    fn default() -> Self {
        Self {
            multiline: true,
            wrap: true,
            halign: HAlign::Auto,
            base_direction: BaseDirection::Auto,
            padding: [6.0; 4],
            line_height: None,
            line_spacing: 0.0,
            word_delimiters: WORD_DELIMITERS.to_string(),
        }
    }
}

/// Pending layout work, ordered by cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Refresh {
    /// Text changed; the tail may be re-flowed incrementally.
    Text,
    /// Width, style or options changed; everything is re-flowed.
    Full,
}

/// An editable text box.
///
/// Mutations mark the layout dirty; [`flush`](Self::flush) re-flows once
/// for any number of pending changes. Read accessors reflect the last
/// flush. Operations that take positions flush first.
pub struct TextBox {
    text: String,
    text_len: usize,
    model: LineModel,
    metrics: Metrics,
    options: TextBoxOptions,
    /// Source of truth for the cursor position.
    cursor_index: usize,
    cursor: Cursor,
    /// Cursor x within its row.
    cursor_offset: f32,
    selection: Selection,
    viewport: Viewport,
    rtl: bool,
    /// Width of every row, parallel to `model`.
    line_extents: Vec<f32>,
    pending_edits: Vec<LineEdit>,
    /// Row count of the model the pending edits apply to.
    pending_base_rows: usize,
    undo: UndoStack,
    dirty: Option<Refresh>,
}

impl core::fmt::Debug for TextBox {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TextBox")
            .field("text_len", &self.text_len)
            .field("rows", &self.model.len())
            .field("cursor_index", &self.cursor_index)
            .field("cursor", &self.cursor)
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl TextBox {
    /// Create an empty text box of `size` pixels and lay it out.
    pub fn new(
        measurer: impl TextMeasurer + 'static,
        style: TextStyle,
        options: TextBoxOptions,
        size: (f32, f32),
    ) -> Self {
        Self::with_parts(Metrics::new(measurer, style), options, UndoStack::new(), size)
    }

    /// Create a text box configured from a [`QuireConfig`].
    pub fn from_config(measurer: impl TextMeasurer + 'static, config: &QuireConfig, size: (f32, f32)) -> Self {
        let metrics = Metrics::new(measurer, TextStyle::from_config(&config.text))
            .with_cache(WidthCache::from_config(&config.cache));
        Self::with_parts(
            metrics,
            TextBoxOptions::from_config(config),
            UndoStack::from_config(&config.history),
            size,
        )
    }

    fn with_parts(mut metrics: Metrics, options: TextBoxOptions, undo: UndoStack, size: (f32, f32)) -> Self {
        let line_height = options.line_height.unwrap_or_else(|| metrics.line_height());
        let viewport = Viewport::new(size, options.padding, line_height, options.line_spacing);
        let model = LineModel::empty(viewport.inner_width(), options.wraps());
        let mut text_box = Self {
            text: String::new(),
            text_len: 0,
            line_extents: vec![0.0; model.len()],
            model,
            metrics,
            options,
            cursor_index: 0,
            cursor: Cursor::default(),
            cursor_offset: 0.0,
            selection: Selection::default(),
            viewport,
            rtl: false,
            pending_edits: Vec::new(),
            pending_base_rows: 0,
            undo,
            dirty: None,
        };
        text_box.mark_dirty(Refresh::Full);
        text_box.flush();
        text_box
    }

    fn mark_dirty(&mut self, refresh: Refresh) {
        self.dirty = Some(self.dirty.map_or(refresh, |pending| pending.max(refresh)));
    }

    /// Whether a flush is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Run pending layout work. Returns `false` when nothing was pending.
    pub fn flush(&mut self) -> bool {
        let Some(refresh) = self.dirty.take() else {
            return false;
        };
        if refresh == Refresh::Full {
            self.metrics.cache_mut().evict_expired();
        }
        let width = self.viewport.inner_width();
        let wrap = self.options.wraps();
        let old_rows = self.model.len();

        let reuse = refresh == Refresh::Text && self.model.width() == width && self.model.wraps() == wrap;
        let outcome = if reuse {
            let old = core::mem::replace(&mut self.model, LineModel::empty(width, wrap));
            reflow_incremental(old, &self.text, &mut self.metrics)
        } else {
            full_reflow(&self.model, &self.text, width, wrap, &mut self.metrics)
        };

        let model = outcome.model;
        let metrics = &mut self.metrics;
        if outcome.incremental {
            apply_line_edits(&mut self.line_extents, &outcome.edits, |row| metrics.width(model.line(row)));
        } else {
            self.line_extents = model.lines().iter().map(|line| metrics.width(line)).collect();
        }

        if self.pending_edits.is_empty() {
            self.pending_base_rows = old_rows;
            self.pending_edits = outcome.edits;
        } else {
            self.pending_edits = vec![LineEdit {
                old: 0..self.pending_base_rows,
                new: 0..model.len(),
            }];
        }
        self.model = model;

        let first_paragraph = self.text.split('\n').next().unwrap_or("");
        self.rtl = bidi::is_rtl(first_paragraph, self.options.base_direction);

        self.cursor_index = self.cursor_index.min(self.text_len);
        self.selection.clamp(self.text_len);
        let cursor = cursor::index_to_cursor(self.cursor_index, &self.model);
        self.place_cursor(cursor);
        true
    }

    /// Set the cursor, reset `scroll_x` on a row change and scroll the
    /// cursor into view.
    fn place_cursor(&mut self, cursor: Cursor) {
        if cursor.row != self.cursor.row {
            self.viewport.scroll_x = 0.0;
        }
        self.cursor = cursor;
        let line = self.model.line(cursor.row);
        self.cursor_offset = self.metrics.width(char_slice(line, 0, cursor.col));
        self.viewport.adjust(
            self.cursor_offset,
            self.row_width(cursor.row),
            cursor.row,
            self.alignment(),
            self.options.multiline,
        );
    }

    fn alignment(&self) -> Alignment {
        Alignment::new(self.options.halign, self.rtl)
    }

    // Mutation

    /// Replace the chars in `start..end` with `substring`.
    ///
    /// `end < start` deletes `end..start`. Indices are clamped to the text.
    /// The cursor moves to the end of the inserted text and the selection
    /// collapses. Returns `false` when the text would not change.
    ///
    /// # Panics
    ///
    /// Panics if `end < start` and `substring` is not empty.
    pub fn replace(&mut self, start: usize, end: usize, substring: &str) -> bool {
        self.replace_inner(start, end, substring, true)
    }

    fn replace_inner(&mut self, start: usize, end: usize, substring: &str, record: bool) -> bool {
        assert!(
            end >= start || substring.is_empty(),
            "cannot insert {substring:?} into a reversed range {start}..{end}"
        );
        let lo = start.min(end).min(self.text_len);
        let hi = start.max(end).min(self.text_len);
        let (lo_byte, hi_byte) = (byte_offset(&self.text, lo), byte_offset(&self.text, hi));
        if &self.text[lo_byte..hi_byte] == substring {
            return false;
        }

        let inserted_len = char_len(substring);
        let cursor_after = lo + inserted_len;
        if record {
            self.undo.push(EditOperation {
                offset: lo,
                removed: self.text[lo_byte..hi_byte].to_string(),
                inserted: substring.to_string(),
                cursor_before: self.cursor_index,
                cursor_after,
            });
        }

        self.text.replace_range(lo_byte..hi_byte, substring);
        self.text_len = self.text_len - (hi - lo) + inserted_len;
        self.cursor_index = cursor_after;
        self.selection.cancel(cursor_after);
        debug!(start = lo, removed = hi - lo, inserted = inserted_len, "text replaced");
        self.mark_dirty(Refresh::Text);
        true
    }

    /// Replace the whole text, dropping selection and history.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.text_len = char_len(text);
        self.cursor_index = self.cursor_index.min(self.text_len);
        self.selection.cancel(self.cursor_index);
        self.undo.clear();
        self.mark_dirty(Refresh::Full);
    }

    /// Type `substring` at the cursor, replacing a finished selection.
    ///
    /// Single-line boxes reject a lone `\n` and drop newlines from longer
    /// input.
    pub fn insert(&mut self, substring: &str) -> bool {
        let substring = if self.options.multiline {
            substring.to_string()
        } else if substring == "\n" {
            return false;
        } else {
            substring.replace('\n', "")
        };
        match self.selection.committed() {
            Some((lo, hi)) => self.replace(lo, hi, &substring),
            None => self.replace(self.cursor_index, self.cursor_index, &substring),
        }
    }

    /// Delete a finished selection.
    pub fn delete_selection(&mut self) -> bool {
        match self.selection.committed() {
            Some((lo, hi)) => self.replace(lo, hi, ""),
            None => false,
        }
    }

    /// Delete the selection, or the grapheme before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.selection.committed().is_some() {
            return self.delete_selection();
        }
        let end_byte = byte_offset(&self.text, self.cursor_index);
        let Some(last) = self.text[..end_byte].graphemes(true).next_back() else {
            return false;
        };
        let start = self.cursor_index - char_len(last);
        self.replace(self.cursor_index, start, "")
    }

    /// Delete the selection, or the grapheme after the cursor.
    pub fn delete_forward(&mut self) -> bool {
        if self.selection.committed().is_some() {
            return self.delete_selection();
        }
        let start_byte = byte_offset(&self.text, self.cursor_index);
        let Some(next) = self.text[start_byte..].graphemes(true).next() else {
            return false;
        };
        let cursor = self.cursor_index;
        self.replace(cursor, cursor + char_len(next), "")
    }

    // History

    /// Revert the latest edit group.
    pub fn undo(&mut self) -> bool {
        match self.undo.undo() {
            Some(operations) => {
                self.apply_history(&operations);
                true
            }
            None => false,
        }
    }

    /// Re-apply the latest undone group.
    pub fn redo(&mut self) -> bool {
        match self.undo.redo() {
            Some(operations) => {
                self.apply_history(&operations);
                true
            }
            None => false,
        }
    }

    fn apply_history(&mut self, operations: &[EditOperation]) {
        for op in operations {
            let end = op.offset + char_len(&op.removed);
            self.replace_inner(op.offset, end, &op.inserted, false);
            self.cursor_index = op.cursor_after.min(self.text_len);
            self.selection.cancel(self.cursor_index);
        }
    }

    /// Forget all undo and redo history.
    pub fn reset_undo(&mut self) {
        self.undo.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    // Geometry and options

    /// Resize the widget. Resets scrolling.
    pub fn set_size(&mut self, size: (f32, f32)) {
        if self.viewport.size() == size {
            return;
        }
        self.viewport.set_size(size);
        self.viewport.reset_scroll();
        self.mark_dirty(Refresh::Full);
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.metrics.set_style(style);
        self.update_line_metrics();
        self.mark_dirty(Refresh::Full);
    }

    pub fn set_options(&mut self, options: TextBoxOptions) {
        self.viewport.set_padding(options.padding);
        self.options = options;
        self.update_line_metrics();
        self.mark_dirty(Refresh::Full);
    }

    fn update_line_metrics(&mut self) {
        let line_height = self.options.line_height.unwrap_or_else(|| self.metrics.line_height());
        self.viewport.set_line_metrics(line_height, self.options.line_spacing);
    }

    pub fn style(&self) -> &TextStyle {
        self.metrics.style()
    }

    pub fn options(&self) -> &TextBoxOptions {
        &self.options
    }

    /// Drop every cached measurement.
    pub fn clear_width_cache(&mut self) {
        self.metrics.cache_mut().clear();
    }

    // Read accessors

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in chars.
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    pub fn line_model(&self) -> &LineModel {
        &self.model
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether the paragraph direction resolved to right-to-left.
    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    /// Cursor x within its row.
    pub fn cursor_offset(&self) -> f32 {
        self.cursor_offset
    }

    /// Widget-space position of the top of the cursor.
    pub fn cursor_pixel_position(&self) -> (f32, f32) {
        self.viewport.cursor_pixel_position(
            self.cursor_offset,
            self.row_width(self.cursor.row),
            self.cursor.row,
            self.alignment(),
        )
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_scroll(&self) -> (f32, f32) {
        self.viewport.scroll()
    }

    pub fn visible_line_range(&self) -> core::ops::Range<usize> {
        self.viewport.visible_line_range(self.model.len())
    }

    pub fn line_height(&self) -> f32 {
        self.viewport.line_height()
    }

    /// Measured width of `row`, 0 for rows that do not exist.
    pub fn row_width(&self, row: usize) -> f32 {
        self.line_extents.get(row).copied().unwrap_or(0.0)
    }

    /// Row edits since the last call, for renderers caching per-row data.
    pub fn take_line_edits(&mut self) -> Vec<LineEdit> {
        core::mem::take(&mut self.pending_edits)
    }

    /// Selection highlight of the visible rows in widget space, clipped
    /// horizontally to the text area.
    pub fn selection_spans(&mut self) -> Vec<SelectionSpan> {
        if !self.selection.is_highlighted() {
            return Vec::new();
        }
        let visible = self.visible_line_range();
        let align = self.alignment();
        let left = self.viewport.padding()[0];
        let right = left + self.viewport.inner_width();

        let spans = self.selection.per_line_spans(&self.model, &mut self.metrics);
        spans
            .into_iter()
            .filter(|span| visible.contains(&span.row))
            .filter_map(|span| {
                let row_width = self.row_width(span.row);
                let px_start = self.viewport.row_x(span.px_start, row_width, align).max(left);
                let px_end = self.viewport.row_x(span.px_end, row_width, align).min(right);
                (px_end > px_start).then_some(SelectionSpan {
                    row: span.row,
                    px_start,
                    px_end,
                })
            })
            .collect()
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection.selected_text(&self.text)
    }

    // Positions

    pub fn index_to_cursor(&mut self, index: usize) -> Cursor {
        self.flush();
        cursor::index_to_cursor(index, &self.model)
    }

    pub fn cursor_to_index(&mut self, cursor: Cursor) -> usize {
        self.flush();
        cursor::cursor_to_index(cursor, &self.model)
    }

    pub fn expand_to_word(&mut self, index: usize) -> (usize, usize) {
        self.flush();
        selection::expand_to_word(&self.model, index, &self.options.word_delimiters)
    }

    pub fn expand_to_row_block(&mut self, index: usize) -> (usize, usize) {
        self.flush();
        selection::expand_to_row_block(&self.model, index)
    }

    /// Move the cursor to `cursor` (clamped).
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.flush();
        let cursor = self.model.clamp(cursor);
        self.cursor_index = cursor::cursor_to_index(cursor, &self.model);
        self.place_cursor(cursor);
    }

    /// Move the cursor to a flat char offset (clamped).
    pub fn set_cursor_index(&mut self, index: usize) {
        self.flush();
        self.cursor_index = index.min(self.text_len);
        let cursor = cursor::index_to_cursor(self.cursor_index, &self.model);
        self.place_cursor(cursor);
    }

    /// Keyboard cursor movement.
    ///
    /// Plain moves drop the selection; with `extend` the selection grows
    /// from its anchor (or the old cursor) to the new position.
    /// Control+up/down scroll one row instead.
    pub fn move_cursor(&mut self, action: CursorAction, control: bool, extend: bool) {
        self.flush();
        let page_rows = cursor_movement::page_rows(self.viewport.inner_height(), self.viewport.row_pitch());
        let ctx = MovementContext {
            text: &self.text,
            model: &self.model,
            page_rows,
            selection: if extend { None } else { self.selection.committed() },
        };
        let Some(cursor) = CursorMovement::apply(&ctx, self.cursor, action, control) else {
            if self.options.multiline {
                let delta = if action == CursorAction::Up { -1 } else { 1 };
                self.scroll_by_lines(delta);
            }
            return;
        };

        let anchor = if self.selection.is_highlighted() {
            self.selection.anchor()
        } else {
            self.cursor_index
        };
        self.cursor_index = cursor::cursor_to_index(cursor, &self.model);
        if extend {
            self.selection.set(anchor, self.cursor_index);
            self.selection.finish();
        } else {
            self.selection.cancel(self.cursor_index);
        }
        self.place_cursor(cursor);
    }

    /// Scroll by whole rows, clamped to the content.
    pub fn scroll_by_lines(&mut self, delta: isize) {
        self.viewport.scroll_by_lines(delta, self.model.len());
    }

    // Selection

    /// Select `start..end` (flat char offsets).
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    pub fn select_text(&mut self, start: usize, end: usize) {
        self.selection.select(start, end, self.text_len);
    }

    pub fn select_all(&mut self) {
        self.selection.select(0, self.text_len, self.text_len);
    }

    pub fn cancel_selection(&mut self) {
        self.selection.cancel(self.cursor_index);
    }

    /// Start a pointer selection at `index`.
    pub fn begin_drag(&mut self, index: usize) {
        let index = index.min(self.text_len);
        self.selection.set(index, index);
        self.set_cursor_index(index);
    }

    /// Extend a pointer selection to `index`.
    pub fn update_drag(&mut self, index: usize) {
        let index = index.min(self.text_len);
        self.selection.extend_to(index);
        self.set_cursor_index(index);
    }

    pub fn finish_drag(&mut self) {
        self.selection.finish();
    }

    /// Select the word around the visual cursor (double tap).
    pub fn select_word_at_cursor(&mut self) {
        self.flush();
        let (start, end) = selection::expand_word_at(&self.model, self.cursor, &self.options.word_delimiters);
        self.select_text(start, end);
    }

    /// Select the paragraph around the cursor (triple tap).
    pub fn select_row_block_at_cursor(&mut self) {
        let (start, end) = self.expand_to_row_block(self.cursor_index);
        self.select_text(start, end);
    }
}
