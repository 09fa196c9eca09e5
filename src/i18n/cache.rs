// SPDX-License-Identifier: MPL-2.0
//! Memoized translation results.
//!
//! # Design
//!
//! - **Canonical keys**: the key function turns `(key, params)` into a string;
//!   structurally equal params map to the same entry
//! - **LRU eviction**: bounded by a configurable entry count
//! - **Full invalidation**: [`TranslationCache::clear`] drops every entry when the
//!   active language changes; statistics survive the clear

use super::args::TranslationArgs;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Builds the memo key for a lookup.
pub type KeyFn = fn(&str, Option<&TranslationArgs>) -> String;

/// Separates the translation key from the canonical params in a memo key.
const PARAMS_SEPARATOR: char = '\u{1f}';

/// The translation key alone, or the key and the canonical params joined by
/// [`PARAMS_SEPARATOR`].
#[must_use]
pub fn canonical_key(key: &str, args: Option<&TranslationArgs>) -> String {
    match args {
        None => key.to_string(),
        Some(args) => format!("{}{}{}", key, PARAMS_SEPARATOR, args.canonical()),
    }
}

/// Statistics about memo performance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the memo.
    pub hits: u64,
    /// Lookups that had to format.
    pub misses: u64,
    /// Full invalidations.
    pub clears: u64,
}

impl CacheStats {
    /// Returns the hit rate as a percentage (0.0 - 100.0).
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Memo of formatted translations for the active language.
#[derive(Debug)]
pub struct TranslationCache {
    entries: LruCache<String, String>,
    key_fn: KeyFn,
    stats: CacheStats,
}

impl TranslationCache {
    /// A cache holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_key_fn(capacity, canonical_key)
    }

    /// Same as [`TranslationCache::new`] with a custom key function.
    #[must_use]
    pub fn with_key_fn(capacity: usize, key_fn: KeyFn) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            key_fn,
            stats: CacheStats::default(),
        }
    }

    /// Returns the memoized value, calling `compute` only on a miss.
    pub fn get_or_insert_with<F>(
        &mut self,
        key: &str,
        args: Option<&TranslationArgs>,
        compute: F,
    ) -> String
    where
        F: FnOnce() -> String,
    {
        let memo_key = (self.key_fn)(key, args);
        if let Some(value) = self.entries.get(&memo_key) {
            self.stats.hits += 1;
            return value.clone();
        }
        self.stats.misses += 1;
        let value = compute();
        self.entries.put(memo_key, value.clone());
        value
    }

    /// Drops every memoized value.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.clears += 1;
    }

    #[must_use]
    pub fn contains(&self, key: &str, args: Option<&TranslationArgs>) -> bool {
        self.entries.contains(&(self.key_fn)(key, args))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn key_without_args_is_the_key() {
        assert_eq!(canonical_key("hello", None), "hello");
    }

    #[test]
    fn key_with_args_appends_canonical_params() {
        let args = TranslationArgs::new().with("name", "Ada");
        assert_eq!(
            canonical_key("greeting", Some(&args)),
            "greeting\u{1f}{\"name\":\"Ada\"}"
        );
    }

    #[test]
    fn raw_key_cannot_spell_a_key_with_args() {
        let args = TranslationArgs::new().with("name", "Ada");
        assert_ne!(
            canonical_key(r#"greeting{"name":"Ada"}"#, None),
            canonical_key("greeting", Some(&args))
        );
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let mut cache = TranslationCache::new(8);
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "Hello".to_string()
        };

        assert_eq!(cache.get_or_insert_with("hello", None, compute), "Hello");
        assert_eq!(cache.get_or_insert_with("hello", None, compute), "Hello");

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn equal_args_built_separately_share_an_entry() {
        let mut cache = TranslationCache::new(8);
        let first = TranslationArgs::new().with("a", 1_i64).with("b", "x");
        let second = TranslationArgs::new().with("b", "x").with("a", 1_i64);

        cache.get_or_insert_with("k", Some(&first), || "v".to_string());
        assert!(cache.contains("k", Some(&second)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_but_keeps_stats() {
        let mut cache = TranslationCache::new(8);
        cache.get_or_insert_with("hello", None, || "Hello".to_string());
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().clears, 1);
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let mut cache = TranslationCache::new(2);
        cache.get_or_insert_with("a", None, || "A".to_string());
        cache.get_or_insert_with("b", None, || "B".to_string());
        cache.get_or_insert_with("c", None, || "C".to_string());

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("a", None));
        assert!(cache.contains("c", None));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        assert_eq!(TranslationCache::new(0).capacity(), 1);
    }

    #[test]
    fn custom_key_fn_can_ignore_args() {
        fn key_only(key: &str, _: Option<&TranslationArgs>) -> String {
            key.to_string()
        }
        let mut cache = TranslationCache::with_key_fn(4, key_only);
        let args = TranslationArgs::new().with("n", 1_i64);

        cache.get_or_insert_with("k", None, || "plain".to_string());
        let value = cache.get_or_insert_with("k", Some(&args), || "with args".to_string());

        assert_eq!(value, "plain");
    }

    #[test]
    fn hit_rate_is_a_percentage() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            clears: 0,
        };
        assert!((stats.hit_rate() - 75.0).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
