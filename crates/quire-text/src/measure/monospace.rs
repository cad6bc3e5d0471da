use hashbrown::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

use super::{Extent, TextMeasurer, TextStyle};
use crate::error::{MeasureError, Result};

/// Fixed-advance measurer.
///
/// Every grapheme cluster advances by `advance` pixels unless its first char
/// has a width factor registered with [`with_wide`](Self::with_wide).
/// Useful for terminals, tests and headless layout.
#[derive(Debug, Clone)]
pub struct MonospaceMeasurer {
    advance: f32,
    line_height: f32,
    wide: HashMap<char, f32>,
    unmeasurable: HashSet<char>,
}

impl MonospaceMeasurer {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
            wide: HashMap::new(),
            unmeasurable: HashSet::new(),
        }
    }

    /// Clusters starting with `ch` advance by `factor * advance`.
    pub fn with_wide(mut self, ch: char, factor: f32) -> Self {
        self.wide.insert(ch, factor);
        self
    }

    /// Measuring any text containing `ch` fails.
    pub fn with_unmeasurable(mut self, ch: char) -> Self {
        self.unmeasurable.insert(ch);
        self
    }

    pub fn advance(&self) -> f32 {
        self.advance
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, _style: &TextStyle) -> Result<Extent> {
        if let Some(ch) = text.chars().find(|c| self.unmeasurable.contains(c)) {
            return Err(MeasureError::Unmeasurable(ch));
        }
        let width = text
            .graphemes(true)
            .map(|g| {
                let factor = g
                    .chars()
                    .next()
                    .and_then(|c| self.wide.get(&c).copied())
                    .unwrap_or(1.0);
                self.advance * factor
            })
            .sum();
        Ok(Extent::new(width, self.line_height))
    }
}
