// SPDX-License-Identifier: MPL-2.0
//! The locale context: active language, layout direction, bundles and memo.
//!
//! A context is an explicit value owned by the presentation layer. Several
//! contexts can live side by side, e.g. in parallel tests.
//!
//! [`LocaleContext::resolve`] applies its effects in one step: the bundle for
//! the new language is loaded first, and only when that succeeds is the memo
//! cleared, the layout direction set and the active locale replaced. A failed
//! load leaves the previous state untouched.

use super::args::TranslationArgs;
use super::bundle::{missing_marker, BundleSource, BundleStore};
use super::cache::{CacheStats, TranslationCache};
use super::locale::{ActiveLocale, LocaleDescriptor, SupportedLanguages, TextDirection};
use super::resolver::{self, LanguageMatch};
use crate::config::{Config, DEFAULT_CACHE_CAPACITY};
use crate::error::Result;

#[derive(Debug)]
pub struct LocaleContext {
    supported: SupportedLanguages,
    bundles: BundleStore,
    cache: TranslationCache,
    active: ActiveLocale,
    layout_direction: TextDirection,
    resolutions: u64,
}

impl LocaleContext {
    /// Validates `bundles` against `supported`, then resolves `preferred` once.
    pub fn new(
        supported: SupportedLanguages,
        bundles: BundleStore,
        cache: TranslationCache,
        preferred: &[LocaleDescriptor],
    ) -> Result<Self> {
        bundles.validate(&supported)?;
        let fallback = resolver::fallback_match();
        let mut context = Self {
            supported,
            bundles,
            cache,
            active: ActiveLocale::new(fallback.language, fallback.direction),
            layout_direction: fallback.direction,
            resolutions: 0,
        };
        context.resolve(preferred)?;
        Ok(context)
    }

    /// Builds a context from the `[i18n]` config section.
    pub fn from_config(config: &Config, preferred: &[LocaleDescriptor]) -> Result<Self> {
        let supported = SupportedLanguages::parse(&config.i18n.supported)?;
        let bundles = BundleStore::new(
            BundleSource::from_dir(config.i18n.translations_dir.clone()),
            config.i18n.use_isolating,
        );
        let cache = TranslationCache::new(config.i18n.effective_cache_capacity());
        Self::new(supported, bundles, cache, preferred)
    }

    /// Embedded bundles for the default languages, default memo size.
    pub fn with_embedded(preferred: &[LocaleDescriptor]) -> Result<Self> {
        let supported = SupportedLanguages::parse(crate::config::DEFAULT_SUPPORTED_LANGUAGES)?;
        Self::new(
            supported,
            BundleStore::embedded(),
            TranslationCache::new(DEFAULT_CACHE_CAPACITY),
            preferred,
        )
    }

    /// Picks the best language for `preferred` and makes it active.
    ///
    /// Always clears the memo, even when the language does not change.
    pub fn resolve(&mut self, preferred: &[LocaleDescriptor]) -> Result<LanguageMatch> {
        let found = resolver::resolve(preferred, &self.supported);
        self.bundles.get_or_load(&found.language)?;

        self.cache.clear();
        self.layout_direction = found.direction;
        let next = ActiveLocale::new(found.language.clone(), found.direction);
        if next != self.active {
            tracing::info!(from = %self.active, to = %next, "active locale changed");
        }
        self.active = next;
        self.resolutions += 1;

        Ok(found)
    }

    /// Localized text for `key` in the active language, memoized.
    pub fn translate(&mut self, key: &str, args: Option<&TranslationArgs>) -> String {
        let bundles = &self.bundles;
        let language = &self.active.language;
        self.cache.get_or_insert_with(key, args, || {
            // `resolve` loads the bundle before activating its language.
            bundles
                .get(language)
                .map_or_else(|| missing_marker(key), |bundle| bundle.format(key, args))
        })
    }

    /// Shorthand for a lookup without parameters.
    pub fn tr(&mut self, key: &str) -> String {
        self.translate(key, None)
    }

    #[must_use]
    pub fn active(&self) -> &ActiveLocale {
        &self.active
    }

    /// The process-wide layout direction last applied by [`LocaleContext::resolve`].
    #[must_use]
    pub fn layout_direction(&self) -> TextDirection {
        self.layout_direction
    }

    #[must_use]
    pub fn supported(&self) -> &SupportedLanguages {
        &self.supported
    }

    #[must_use]
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub fn bundles(&self) -> &BundleStore {
        &self.bundles
    }

    /// Number of completed resolutions, including the initial one.
    #[must_use]
    pub fn resolutions(&self) -> u64 {
        self.resolutions
    }
}
