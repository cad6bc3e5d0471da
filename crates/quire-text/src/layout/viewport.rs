use core::ops::Range;

use quire_config::HAlign;

/// Horizontal alignment resolved against the paragraph direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub halign: HAlign,
    /// Base direction of the text is right-to-left.
    pub rtl: bool,
}

impl Alignment {
    pub fn new(halign: HAlign, rtl: bool) -> Self {
        Self { halign, rtl }
    }

    /// Right-aligned, explicitly or as `Auto` on RTL text.
    pub fn is_right(&self) -> bool {
        self.halign == HAlign::Right || (self.halign == HAlign::Auto && self.rtl)
    }

    /// Any alignment that pushes short rows away from the left edge.
    pub fn is_shifted(&self) -> bool {
        self.halign == HAlign::Center || self.is_right()
    }

    /// X offset of a row `row_width` wide inside `viewport_width`.
    pub fn offset(&self, row_width: f32, viewport_width: f32) -> f32 {
        if self.halign == HAlign::Center {
            ((viewport_width - row_width) / 2.0).max(0.0)
        } else if self.is_right() {
            (viewport_width - row_width).max(0.0)
        } else {
            0.0
        }
    }
}

/// Scroll state of the text box.
///
/// Coordinates have their origin at the top-left corner of the widget,
/// with y growing downwards. Row `r` sits at `r * row_pitch` in content
/// space.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub scroll_x: f32,
    pub scroll_y: f32,
    size: (f32, f32),
    /// `[left, top, right, bottom]`.
    padding: [f32; 4],
    line_height: f32,
    line_spacing: f32,
}

impl Viewport {
    pub fn new(size: (f32, f32), padding: [f32; 4], line_height: f32, line_spacing: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            size,
            padding,
            line_height,
            line_spacing,
        }
    }

    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    pub fn set_size(&mut self, size: (f32, f32)) {
        self.size = size;
    }

    pub fn padding(&self) -> [f32; 4] {
        self.padding
    }

    pub fn set_padding(&mut self, padding: [f32; 4]) {
        self.padding = padding;
    }

    pub fn set_line_metrics(&mut self, line_height: f32, line_spacing: f32) {
        self.line_height = line_height;
        self.line_spacing = line_spacing;
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Distance between the tops of consecutive rows.
    pub fn row_pitch(&self) -> f32 {
        self.line_height + self.line_spacing
    }

    /// Width available to text (padding removed).
    pub fn inner_width(&self) -> f32 {
        (self.size.0 - self.padding[0] - self.padding[2]).max(0.0)
    }

    /// Height available to text (padding removed).
    pub fn inner_height(&self) -> f32 {
        (self.size.1 - self.padding[1] - self.padding[3]).max(0.0)
    }

    pub fn scroll(&self) -> (f32, f32) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_x = 0.0;
        self.scroll_y = 0.0;
    }

    /// Scroll just enough to show the cursor.
    ///
    /// `cursor_offset` is the cursor x within its row and `row_width` the
    /// width of that row. Single-line boxes aligned away from the left stop
    /// scrolling once the row end is in view.
    pub fn adjust(&mut self, cursor_offset: f32, row_width: f32, row: usize, align: Alignment, multiline: bool) {
        let viewport_width = self.inner_width();
        if cursor_offset - self.scroll_x > viewport_width {
            self.scroll_x = cursor_offset - viewport_width;
        } else if cursor_offset < self.scroll_x {
            self.scroll_x = cursor_offset;
        }

        let row_end_scroll = row_width - viewport_width;
        if !multiline
            && align.is_shifted()
            && cursor_offset >= row_end_scroll
            && self.scroll_x >= row_end_scroll
        {
            self.scroll_x = row_end_scroll.max(0.0);
        }

        let offset_y = row as f32 * self.row_pitch();
        let room = (self.inner_height() - self.row_pitch()).max(0.0);
        if offset_y > self.scroll_y + room {
            self.scroll_y = offset_y - room;
        } else if offset_y < self.scroll_y {
            self.scroll_y = offset_y;
        }
    }

    /// Rows intersecting the viewport, clamped to `line_count`.
    pub fn visible_line_range(&self, line_count: usize) -> Range<usize> {
        let pitch = self.row_pitch();
        if pitch <= 0.0 {
            return 0..line_count;
        }
        let first = ((self.scroll_y / pitch).floor().max(0.0) as usize).min(line_count);
        let last = (((self.scroll_y + self.inner_height()) / pitch).ceil().max(0.0) as usize).min(line_count);
        first..last.max(first)
    }

    /// Widget-space position of the top of the cursor.
    pub fn cursor_pixel_position(&self, cursor_offset: f32, row_width: f32, row: usize, align: Alignment) -> (f32, f32) {
        let x = self.padding[0] + align.offset(row_width, self.inner_width()) + cursor_offset - self.scroll_x;
        let y = self.padding[1] + row as f32 * self.row_pitch() - self.scroll_y;
        (x, y)
    }

    /// Widget-space x of a row-local pixel.
    pub fn row_x(&self, local_x: f32, row_width: f32, align: Alignment) -> f32 {
        self.padding[0] + align.offset(row_width, self.inner_width()) + local_x - self.scroll_x
    }

    /// Widget-space y of the top of `row`.
    pub fn row_y(&self, row: usize) -> f32 {
        self.padding[1] + row as f32 * self.row_pitch() - self.scroll_y
    }

    /// Scroll by whole rows, clamped to the content.
    pub fn scroll_by_lines(&mut self, delta: isize, line_count: usize) {
        let pitch = self.row_pitch();
        let content = line_count as f32 * pitch;
        let max = (content - self.inner_height()).max(0.0);
        self.scroll_y = (self.scroll_y + delta as f32 * pitch).clamp(0.0, max);
    }
}
