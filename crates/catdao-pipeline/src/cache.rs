//! Rendered portrait cache
//!
//! Rendering is a pure function of the request, so finished outputs can be
//! reused verbatim. Entries are evicted least-recently-used once the cache
//! holds `capacity` portraits.

use catdao_core::{OutputFormat, Palette, PortraitRequest, RenderOutput};
use std::collections::HashMap;
use tracing::trace;

/// Everything that determines a rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortraitKey {
    pub request: PortraitRequest,
    pub format: OutputFormat,
    pub palette: Palette,
}

impl PortraitKey {
    pub fn new(request: PortraitRequest, format: OutputFormat, palette: Palette) -> Self {
        Self {
            request,
            format,
            palette,
        }
    }
}

/// Cached portrait
#[derive(Debug, Clone)]
pub struct CachedPortrait {
    /// Rendered output
    pub output: RenderOutput,
    /// Logical time of last access
    pub last_accessed: u64,
    /// Access count
    pub access_count: u64,
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Total lookups
    pub lookups: u64,
    /// Cache hits
    pub hits: u64,
    /// Cache misses
    pub misses: u64,
    /// Evictions
    pub evictions: u64,
    /// Insertions
    pub insertions: u64,
}

impl CacheStats {
    /// Hit rate (0.0 - 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }
}

/// LRU cache of rendered portraits
///
/// A capacity of zero disables caching: lookups miss and inserts are dropped.
pub struct PortraitCache {
    entries: HashMap<PortraitKey, CachedPortrait>,
    capacity: usize,
    /// Monotonic access counter used for LRU ordering
    clock: u64,
    stats: CacheStats,
}

impl PortraitCache {
    /// Create a cache holding at most `capacity` portraits
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1024)),
            capacity,
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Look up a portrait, refreshing its recency on a hit
    pub fn get(&mut self, key: &PortraitKey) -> Option<&RenderOutput> {
        self.stats.lookups += 1;
        self.clock += 1;

        if let Some(entry) = self.entries.get_mut(key) {
            self.stats.hits += 1;
            entry.last_accessed = self.clock;
            entry.access_count += 1;
            Some(&entry.output)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Insert a portrait, evicting the least recently used if full
    pub fn insert(&mut self, key: PortraitKey, output: RenderOutput) {
        if self.capacity == 0 {
            return;
        }

        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                self.evict_one();
            }
        }

        self.clock += 1;
        self.entries.insert(
            key,
            CachedPortrait {
                output,
                last_accessed: self.clock,
                access_count: 0,
            },
        );
        self.stats.insertions += 1;
    }

    /// Check if a portrait is cached
    pub fn contains(&self, key: &PortraitKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a cached portrait
    pub fn remove(&mut self, key: &PortraitKey) -> Option<RenderOutput> {
        self.entries.remove(key).map(|e| e.output)
    }

    /// Clear all cached entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn evict_one(&mut self) {
        let lru_key = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.last_accessed)
            .map(|(key, _)| *key);

        if let Some(key) = lru_key {
            self.entries.remove(&key);
            self.stats.evictions += 1;
            trace!(seed = key.request.seed.value(), format = %key.format, "Evicted portrait");
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Approximate bytes held by cached outputs
    pub fn size_bytes(&self) -> usize {
        self.entries.values().map(|e| e.output.memory_size()).sum()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catdao_core::{CatKind, Rarity};

    fn key(seed: i64) -> PortraitKey {
        PortraitKey::new(
            PortraitRequest::new(seed, CatKind::Generic, Rarity::Common),
            OutputFormat::Svg,
            Palette::Natural,
        )
    }

    fn svg(s: &str) -> RenderOutput {
        RenderOutput::Svg(s.to_string())
    }

    #[test]
    fn test_cache_basic() {
        let mut cache = PortraitCache::new(4);
        cache.insert(key(1), svg("<svg/>"));

        assert!(cache.contains(&key(1)));
        assert_eq!(cache.get(&key(1)), Some(&svg("<svg/>")));
        assert_eq!(cache.size_bytes(), 6);
    }

    #[test]
    fn test_cache_stats() {
        let mut cache = PortraitCache::new(4);
        cache.insert(key(1), svg("a"));

        // Hit
        cache.get(&key(1));
        assert_eq!(cache.stats().hits, 1);

        // Miss
        cache.get(&key(2));
        assert_eq!(cache.stats().misses, 1);

        assert!((cache.stats().hit_rate() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = PortraitCache::new(2);
        cache.insert(key(1), svg("1"));
        cache.insert(key(2), svg("2"));

        // Refresh 1 so 2 becomes the eviction candidate
        cache.get(&key(1));
        cache.insert(key(3), svg("3"));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.contains(&key(1)));
        assert!(!cache.contains(&key(2)));
        assert!(cache.contains(&key(3)));
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let mut cache = PortraitCache::new(2);
        cache.insert(key(1), svg("1"));
        cache.insert(key(2), svg("2"));
        cache.insert(key(2), svg("2b"));

        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get(&key(2)), Some(&svg("2b")));
    }

    #[test]
    fn test_key_distinguishes_flags_and_format() {
        let base = key(1);
        let profile = PortraitKey {
            request: base.request.with_profile(true),
            ..base
        };
        let ascii = PortraitKey {
            format: OutputFormat::Ascii,
            ..base
        };
        assert_ne!(base, profile);
        assert_ne!(base, ascii);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut cache = PortraitCache::new(0);
        cache.insert(key(1), svg("1"));
        assert!(cache.is_empty());
        assert!(cache.get(&key(1)).is_none());
    }
}
