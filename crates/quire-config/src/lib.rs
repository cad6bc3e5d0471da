//! Quire configuration system
//!
//! This crate provides centralized configuration for Quire text boxes,
//! loading settings from `quire.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for [`QuireConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Convenient result alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main configuration structure for Quire
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct QuireConfig {
    /// Text styling and measurement settings
    pub text: TextConfig,
    /// Line layout and viewport settings
    pub layout: LayoutConfig,
    /// Measurement cache settings
    pub cache: CacheConfig,
    /// Undo history settings
    pub history: HistoryConfig,
}

/// Horizontal alignment of rows inside the viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Left for LTR paragraphs, right for RTL paragraphs.
    Auto,
}

/// Base paragraph direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Detect from the first strong character.
    #[default]
    Auto,
    Ltr,
    Rtl,
}

/// Text styling configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    /// Font family name handed to the text measurer
    pub font_family: Option<String>,
    /// Font size in pixels
    pub font_size: f32,
    /// Number of spaces a tab expands to when measuring
    pub tab_width: usize,
    /// Mask every character with `password_mask`
    pub password: bool,
    /// Replacement character used in password mode
    pub password_mask: char,
    /// Fixed line height in pixels (measured from the font when unset)
    pub line_height: Option<f32>,
    /// Extra spacing between rows in pixels
    pub line_spacing: f32,
}

/// Layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Accept and display more than one logical line
    pub multiline: bool,
    /// Word-wrap rows to the viewport width (multiline only)
    pub wrap: bool,
    /// Horizontal alignment of rows
    pub halign: HAlign,
    /// Base paragraph direction
    pub base_direction: Direction,
    /// Padding as [left, top, right, bottom] in pixels
    pub padding: [f32; 4],
    /// Characters that end a word for double-tap selection
    pub word_delimiters: String,
}

/// Width cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Drop measured widths older than this many seconds (never when unset)
    pub width_timeout_secs: Option<u64>,
    /// Upper bound on cached entries before the cache is flushed
    pub max_entries: usize,
}

/// Undo history configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo groups to keep
    pub undo_limit: usize,
    /// Merge consecutive typing into one undo step
    pub group_typing: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 15.0,
            tab_width: 4,
            password: false,
            password_mask: '*',
            line_height: None,
            line_spacing: 0.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            multiline: true,
            wrap: true,
            halign: HAlign::Auto,
            base_direction: Direction::Auto,
            padding: [6.0, 6.0, 6.0, 6.0],
            word_delimiters: " .,:;!?'\"<>()[]{}".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            width_timeout_secs: Some(60),
            max_entries: 4096,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            undo_limit: 1000,
            group_typing: true,
        }
    }
}

impl QuireConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the quire.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML source text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location (quire.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("quire.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup.
    ///
    /// Unparseable values are ignored and leave the current setting in place.
    pub fn merge_with_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |val: &str| val == "1" || val.eq_ignore_ascii_case("true");

        // Text settings
        if let Some(family) = lookup("QUIRE_FONT_FAMILY") {
            self.text.font_family = Some(family);
        }
        if let Some(size) = lookup("QUIRE_FONT_SIZE").and_then(|v| v.parse::<f32>().ok()) {
            self.text.font_size = size;
        }
        if let Some(tab) = lookup("QUIRE_TAB_WIDTH").and_then(|v| v.parse::<usize>().ok()) {
            self.text.tab_width = tab;
        }
        if let Some(val) = lookup("QUIRE_PASSWORD") {
            self.text.password = flag(&val);
        }
        if let Some(val) = lookup("QUIRE_LINE_SPACING").and_then(|v| v.parse::<f32>().ok()) {
            self.text.line_spacing = val;
        }

        // Layout settings
        if let Some(val) = lookup("QUIRE_MULTILINE") {
            self.layout.multiline = flag(&val);
        }
        if let Some(val) = lookup("QUIRE_WRAP") {
            self.layout.wrap = flag(&val);
        }
        if let Some(val) = lookup("QUIRE_HALIGN") {
            match val.to_ascii_lowercase().as_str() {
                "left" => self.layout.halign = HAlign::Left,
                "center" => self.layout.halign = HAlign::Center,
                "right" => self.layout.halign = HAlign::Right,
                "auto" => self.layout.halign = HAlign::Auto,
                _ => {}
            }
        }
        if let Some(val) = lookup("QUIRE_BASE_DIRECTION") {
            match val.to_ascii_lowercase().as_str() {
                "auto" => self.layout.base_direction = Direction::Auto,
                "ltr" => self.layout.base_direction = Direction::Ltr,
                "rtl" => self.layout.base_direction = Direction::Rtl,
                _ => {}
            }
        }

        // Cache settings
        // "0" disables the timeout.
        if let Some(secs) = lookup("QUIRE_WIDTH_CACHE_TIMEOUT").and_then(|v| v.parse::<u64>().ok()) {
            self.cache.width_timeout_secs = (secs > 0).then_some(secs);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from quire.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
