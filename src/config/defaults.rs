// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Languages**: Fallback language and the packaged language set
//! - **Translation Cache**: Memo capacity bounds
//! - **Watch**: Device-locale polling interval

// ==========================================================================
// Language Defaults
// ==========================================================================

/// Language used when no device locale matches a supported language.
///
/// Its bundle must always be packaged.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Languages with bundled translation resources, in declaration order.
pub const DEFAULT_SUPPORTED_LANGUAGES: &[&str] = &["ar", "en", "fr", "it"];

/// Probe list rendered by the inspection screen's best-match row.
pub const BEST_MATCH_PROBE: &[&str] = &["en-US", "en", "fr", "it"];

/// Keys translated by the inspection screen when none are given.
pub const DEFAULT_EXAMPLE_KEYS: &[&str] = &["hello", "test"];

// ==========================================================================
// Translation Cache Defaults
// ==========================================================================

/// Default number of memoized translations.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Minimum number of memoized translations.
pub const MIN_CACHE_CAPACITY: usize = 16;

/// Maximum number of memoized translations.
pub const MAX_CACHE_CAPACITY: usize = 65_536;

// ==========================================================================
// Watch Defaults
// ==========================================================================

/// Default device-locale polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Minimum polling interval in milliseconds.
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Maximum polling interval in milliseconds.
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_CACHE_CAPACITY > 0);
    assert!(MAX_CACHE_CAPACITY >= MIN_CACHE_CAPACITY);
    assert!(DEFAULT_CACHE_CAPACITY >= MIN_CACHE_CAPACITY);
    assert!(DEFAULT_CACHE_CAPACITY <= MAX_CACHE_CAPACITY);

    assert!(MIN_POLL_INTERVAL_MS > 0);
    assert!(MAX_POLL_INTERVAL_MS >= MIN_POLL_INTERVAL_MS);
    assert!(DEFAULT_POLL_INTERVAL_MS >= MIN_POLL_INTERVAL_MS);
    assert!(DEFAULT_POLL_INTERVAL_MS <= MAX_POLL_INTERVAL_MS);

    assert!(!DEFAULT_SUPPORTED_LANGUAGES.is_empty());
    assert!(!DEFAULT_EXAMPLE_KEYS.is_empty());
};
