use std::time::{Duration, Instant};

use hashbrown::HashMap;

use super::{Extent, TextStyle};

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    extent: Extent,
    stored_at: Instant,
}

/// Measured extents keyed by `(style, content)`.
///
/// Owned by the engine instance. Entries may be dropped at any time
/// (`clear`, timeout, size limit); a miss simply re-measures.
#[derive(Debug)]
pub struct WidthCache {
    entries: HashMap<TextStyle, HashMap<String, CacheEntry>>,
    len: usize,
    /// Entries older than this are treated as misses.
    timeout: Option<Duration>,
    /// Reaching this many entries flushes the cache (0 = unbounded).
    max_entries: usize,
}

impl WidthCache {
    /// Cache with the default `[cache]` bounds.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_bounds(timeout: Option<Duration>, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            len: 0,
            timeout,
            max_entries,
        }
    }

    /// Unbounded cache whose entries expire after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_bounds(Some(timeout), 0)
    }

    /// Build a cache from the `[cache]` configuration section.
    pub fn from_config(config: &quire_config::CacheConfig) -> Self {
        Self::with_bounds(config.width_timeout_secs.map(Duration::from_secs), config.max_entries)
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Look up a fresh entry.
    pub fn get(&mut self, style: &TextStyle, text: &str) -> Option<Extent> {
        self.get_at(style, text, Instant::now())
    }

    fn get_at(&mut self, style: &TextStyle, text: &str, now: Instant) -> Option<Extent> {
        let timeout = self.timeout;
        let per_style = self.entries.get_mut(style)?;
        let entry = *per_style.get(text)?;
        match timeout {
            Some(timeout) if now.saturating_duration_since(entry.stored_at) > timeout => {
                per_style.remove(text);
                self.len -= 1;
                None
            }
            _ => Some(entry.extent),
        }
    }

    pub fn insert(&mut self, style: &TextStyle, text: &str, extent: Extent) {
        self.insert_at(style, text, extent, Instant::now());
    }

    fn insert_at(&mut self, style: &TextStyle, text: &str, extent: Extent, now: Instant) {
        if self.max_entries > 0 && self.len >= self.max_entries {
            self.clear();
        }
        let per_style = match self.entries.get_mut(style) {
            Some(per_style) => per_style,
            None => self.entries.entry(style.clone()).or_default(),
        };
        let entry = CacheEntry {
            extent,
            stored_at: now,
        };
        if per_style.insert(text.to_owned(), entry).is_none() {
            self.len += 1;
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
    }

    /// Drop entries stored more than `max_age` before `now`.
    pub fn evict_older_than(&mut self, max_age: Duration, now: Instant) {
        let mut removed = 0;
        for per_style in self.entries.values_mut() {
            per_style.retain(|_, entry| {
                let keep = now.saturating_duration_since(entry.stored_at) <= max_age;
                if !keep {
                    removed += 1;
                }
                keep
            });
        }
        self.entries.retain(|_, per_style| !per_style.is_empty());
        self.len -= removed;
    }

    /// Drop entries past the configured timeout. No-op without a timeout.
    pub fn evict_expired(&mut self) {
        if let Some(timeout) = self.timeout {
            self.evict_older_than(timeout, Instant::now());
        }
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::from_config(&quire_config::CacheConfig::default())
    }
}
