//! Text measurement.
//!
//! Glyph metrics are not computed here: a [`TextMeasurer`] supplied by the
//! embedding widget turns a string and a [`TextStyle`] into a pixel
//! [`Extent`]. [`Metrics`] wraps the measurer with tab expansion, password
//! masking, the [`WidthCache`] and the failure fallback used by layout.

pub mod cache;
pub mod monospace;

use std::borrow::Cow;
use std::hash::{Hash, Hasher};

use quire_config::TextConfig;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

pub use cache::WidthCache;
pub use monospace::MonospaceMeasurer;

/// Rendered size of a string in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Style attributes that influence measurement.
///
/// Equality and hashing use the bit pattern of `font_size`, so a style can
/// key the width cache.
#[derive(Debug, Clone)]
pub struct TextStyle {
    /// Font family handed to the measurer (`None` = backend default).
    pub font_family: Option<String>,
    /// Font size in pixels.
    pub font_size: f32,
    /// Spaces per tab.
    pub tab_width: usize,
    /// When set, every char is measured as this mask character.
    pub password_mask: Option<char>,
}

impl TextStyle {
    /// Build a style from the `[text]` configuration section.
    pub fn from_config(config: &TextConfig) -> Self {
        Self {
            font_family: config.font_family.clone(),
            font_size: config.font_size,
            tab_width: config.tab_width,
            password_mask: config.password.then_some(config.password_mask),
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::from_config(&TextConfig::default())
    }
}

impl PartialEq for TextStyle {
    fn eq(&self, other: &Self) -> bool {
        self.font_family == other.font_family
            && self.font_size.to_bits() == other.font_size.to_bits()
            && self.tab_width == other.tab_width
            && self.password_mask == other.password_mask
    }
}

impl Eq for TextStyle {}

impl Hash for TextStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font_family.hash(state);
        self.font_size.to_bits().hash(state);
        self.tab_width.hash(state);
        self.password_mask.hash(state);
    }
}

/// Capability to measure rendered text.
pub trait TextMeasurer {
    /// Measure `text` rendered with `style`.
    fn measure(&self, text: &str, style: &TextStyle) -> Result<Extent>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<Extent> {
        (**self).measure(text, style)
    }
}

/// Measuring front used by layout: measurer + style + cache.
pub struct Metrics {
    measurer: Box<dyn TextMeasurer>,
    style: TextStyle,
    cache: WidthCache,
}

impl core::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Metrics")
            .field("style", &self.style)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Metrics {
    pub fn new(measurer: impl TextMeasurer + 'static, style: TextStyle) -> Self {
        Self {
            measurer: Box::new(measurer),
            style,
            cache: WidthCache::default(),
        }
    }

    /// Replace the default cache (60 s timeout, 4096 entries).
    pub fn with_cache(mut self, cache: WidthCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Change the measuring style. Cached entries of other styles stay
    /// until they expire or the cache is cleared.
    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    pub fn cache(&self) -> &WidthCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut WidthCache {
        &mut self.cache
    }

    /// Extent of `text` as displayed (tabs expanded, password masked).
    pub fn extent(&mut self, text: &str) -> Extent {
        if let Some(extent) = self.cache.get(&self.style, text) {
            return extent;
        }
        let display = self.display_text(text);
        let extent = self.measure_degraded(&display);
        self.cache.insert(&self.style, text, extent);
        extent
    }

    /// Width of `text` as displayed.
    pub fn width(&mut self, text: &str) -> f32 {
        self.extent(text).width
    }

    /// Height of one row, taken from a reference glyph.
    pub fn line_height(&mut self) -> f32 {
        self.extent("_").height
    }

    fn display_text<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let text = if text.contains('\n') {
            Cow::Owned(text.replace('\n', ""))
        } else {
            Cow::Borrowed(text)
        };
        if let Some(mask) = self.style.password_mask {
            return Cow::Owned(core::iter::repeat_n(mask, text.chars().count()).collect());
        }
        if text.contains('\t') {
            let spaces = " ".repeat(self.style.tab_width);
            return Cow::Owned(text.replace('\t', &spaces));
        }
        text
    }

    /// Measure `text`, dropping trailing graphemes until the measurer
    /// succeeds. The empty string is never sent to the measurer.
    fn measure_degraded(&self, text: &str) -> Extent {
        if text.is_empty() {
            return Extent::default();
        }
        let err = match self.measurer.measure(text, &self.style) {
            Ok(extent) => return extent,
            Err(err) => err,
        };
        warn!(error = %err, len = text.len(), "measurement failed, shortening candidate");

        let mut boundaries: Vec<usize> = text.grapheme_indices(true).map(|(i, _)| i).collect();
        // The first boundary is 0 (the empty prefix).
        while let Some(end) = boundaries.pop() {
            if end == 0 {
                break;
            }
            if let Ok(extent) = self.measurer.measure(&text[..end], &self.style) {
                return extent;
            }
        }
        Extent::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> Metrics {
        Metrics::new(MonospaceMeasurer::new(10.0, 20.0), TextStyle::default())
    }

    #[test]
    fn measures_and_caches() {
        let mut m = metrics();
        assert_eq!(m.width("hello"), 50.0);
        assert_eq!(m.cache().len(), 1);
        assert_eq!(m.width("hello"), 50.0);
        assert_eq!(m.cache().len(), 1);
        assert_eq!(m.width(""), 0.0);
        assert_eq!(m.line_height(), 20.0);
    }

    #[test]
    fn default_cache_expires_and_is_capped() {
        let m = metrics();
        assert_eq!(m.cache().timeout(), Some(std::time::Duration::from_secs(60)));
        assert_eq!(m.cache().max_entries(), 4096);
    }

    #[test]
    fn tabs_expand_to_tab_width() {
        let mut m = metrics();
        assert_eq!(m.width("\t"), 40.0);
        m.set_style(TextStyle {
            tab_width: 2,
            ..TextStyle::default()
        });
        assert_eq!(m.width("a\tb"), 40.0);
    }

    #[test]
    fn password_masks_every_char() {
        let measurer = MonospaceMeasurer::new(10.0, 20.0).with_wide('#', 3.0);
        let mut m = Metrics::new(
            measurer,
            TextStyle {
                password_mask: Some('#'),
                ..TextStyle::default()
            },
        );
        // Each char is measured as a '#', tabs included.
        assert_eq!(m.width("ab\tc"), 120.0);
    }

    #[test]
    fn newlines_are_not_measured() {
        let mut m = metrics();
        assert_eq!(m.width("ab\n"), 20.0);
    }

    #[test]
    fn failing_measurement_degrades_to_prefix() {
        let measurer = MonospaceMeasurer::new(10.0, 20.0).with_unmeasurable('☃');
        let mut m = Metrics::new(measurer, TextStyle::default());
        assert_eq!(m.width("abc☃def"), 30.0);
        assert_eq!(m.width("☃"), 0.0);
    }

    #[test]
    fn style_equality_uses_bits() {
        let a = TextStyle::default();
        let mut b = TextStyle::default();
        assert_eq!(a, b);
        b.font_size += 1.0;
        assert_ne!(a, b);
    }
}
