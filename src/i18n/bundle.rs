// SPDX-License-Identifier: MPL-2.0
//! Fluent translation bundles and their lazy, per-language store.
//!
//! Resources are `<tag>.ftl` files, either embedded in the binary from
//! `assets/i18n/` or read from a directory given at startup. A bundle is parsed
//! the first time its language is selected and kept for the rest of the process.

use super::args::TranslationArgs;
use super::locale::SupportedLanguages;
use crate::config::FALLBACK_LANGUAGE;
use crate::error::{Error, Result};
use fluent_bundle::{FluentBundle, FluentResource};
use rust_embed::RustEmbed;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

const RESOURCE_EXTENSION: &str = "ftl";

/// Text returned for a key the active bundle does not define.
#[must_use]
pub fn missing_marker(key: &str) -> String {
    format!("MISSING: {}", key)
}

// =============================================================================
// TranslationBundle
// =============================================================================

/// Key to template mapping for exactly one language.
pub struct TranslationBundle {
    language: LanguageIdentifier,
    bundle: FluentBundle<FluentResource>,
}

impl std::fmt::Debug for TranslationBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationBundle")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TranslationBundle {
    /// Parses FTL `source` into a bundle for `language`.
    pub fn from_ftl(
        language: LanguageIdentifier,
        source: String,
        use_isolating: bool,
    ) -> Result<Self> {
        let resource = FluentResource::try_new(source).map_err(|(_, errors)| Error::Bundle {
            language: language.to_string(),
            message: format!("{} syntax error(s), first: {:?}", errors.len(), errors.first()),
        })?;
        let mut bundle = FluentBundle::new(vec![language.clone()]);
        bundle.set_use_isolating(use_isolating);
        bundle.add_resource(resource).map_err(|errors| Error::Bundle {
            language: language.to_string(),
            message: format!("{} duplicate message(s), first: {:?}", errors.len(), errors.first()),
        })?;
        Ok(Self { language, bundle })
    }

    #[must_use]
    pub fn language(&self) -> &LanguageIdentifier {
        &self.language
    }

    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }

    /// Formats the template for `key`.
    ///
    /// Unknown keys yield [`missing_marker`]. Placeables Fluent cannot resolve,
    /// such as an absent argument, keep Fluent's own `{$name}` rendering.
    #[must_use]
    pub fn format(&self, key: &str, args: Option<&TranslationArgs>) -> String {
        let Some(pattern) = self.bundle.get_message(key).and_then(|msg| msg.value()) else {
            return missing_marker(key);
        };
        let fluent_args = args.map(TranslationArgs::to_fluent);
        let mut errors = vec![];
        let value = self
            .bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            tracing::debug!(language = %self.language, key, ?errors, "formatting errors");
        }
        value.into_owned()
    }
}

// =============================================================================
// BundleSource
// =============================================================================

/// Where translation resources come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    /// Files compiled in from `assets/i18n/`.
    Embedded,
    /// `<tag>.ftl` files in a directory.
    Directory(PathBuf),
}

impl BundleSource {
    /// Picks a directory source when one is configured.
    #[must_use]
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or(BundleSource::Embedded, BundleSource::Directory)
    }

    fn file_name(language: &LanguageIdentifier) -> String {
        format!("{}.{}", language, RESOURCE_EXTENSION)
    }

    /// Languages that have a resource, in no particular order.
    pub fn available(&self) -> Result<Vec<LanguageIdentifier>> {
        let names: Vec<String> = match self {
            BundleSource::Embedded => Asset::iter().map(|name| name.to_string()).collect(),
            BundleSource::Directory(dir) => fs::read_dir(dir)?
                .filter_map(std::result::Result::ok)
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect(),
        };
        Ok(names
            .iter()
            .filter_map(|name| name.strip_suffix(".ftl"))
            .filter_map(|stem| stem.parse::<LanguageIdentifier>().ok())
            .collect())
    }

    /// Whether a resource exists for `language`.
    #[must_use]
    pub fn has_resource(&self, language: &LanguageIdentifier) -> bool {
        let name = Self::file_name(language);
        match self {
            BundleSource::Embedded => Asset::get(&name).is_some(),
            BundleSource::Directory(dir) => dir.join(name).is_file(),
        }
    }

    /// Reads the raw FTL text for `language`.
    pub fn read(&self, language: &LanguageIdentifier) -> Result<String> {
        let name = Self::file_name(language);
        match self {
            BundleSource::Embedded => Asset::get(&name)
                .map(|file| String::from_utf8_lossy(file.data.as_ref()).into_owned())
                .ok_or_else(|| Error::MissingBundle(language.to_string())),
            BundleSource::Directory(dir) => {
                let path = dir.join(name);
                if !path.is_file() {
                    return Err(Error::MissingBundle(language.to_string()));
                }
                Ok(fs::read_to_string(path)?)
            }
        }
    }
}

// =============================================================================
// BundleStore
// =============================================================================

/// Lazily loaded bundles, cached by language.
#[derive(Debug)]
pub struct BundleStore {
    source: BundleSource,
    use_isolating: bool,
    loaded: HashMap<LanguageIdentifier, TranslationBundle>,
    load_count: usize,
}

impl BundleStore {
    #[must_use]
    pub fn new(source: BundleSource, use_isolating: bool) -> Self {
        Self {
            source,
            use_isolating,
            loaded: HashMap::new(),
            load_count: 0,
        }
    }

    /// A store over the embedded resources without bidi isolation.
    #[must_use]
    pub fn embedded() -> Self {
        Self::new(BundleSource::Embedded, false)
    }

    #[must_use]
    pub fn source(&self) -> &BundleSource {
        &self.source
    }

    /// Checks that every supported language, and the fallback, has a resource.
    ///
    /// Run once before the first resolution so a packaging mistake surfaces at
    /// startup rather than during a lookup.
    pub fn validate(&self, supported: &SupportedLanguages) -> Result<()> {
        let fallback = FALLBACK_LANGUAGE
            .parse::<LanguageIdentifier>()
            .map_err(|_| Error::InvalidLanguageTag(FALLBACK_LANGUAGE.to_string()))?;
        for language in supported.iter().chain(std::iter::once(&fallback)) {
            if !self.source.has_resource(language) {
                tracing::warn!(%language, source = ?self.source, "translation bundle missing");
                return Err(Error::MissingBundle(language.to_string()));
            }
        }
        Ok(())
    }

    /// Returns the bundle for `language`, parsing it on first use.
    pub fn get_or_load(&mut self, language: &LanguageIdentifier) -> Result<&TranslationBundle> {
        match self.loaded.entry(language.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let source = self.source.read(language)?;
                let bundle = TranslationBundle::from_ftl(language.clone(), source, self.use_isolating)?;
                self.load_count += 1;
                tracing::debug!(%language, "loaded translation bundle");
                Ok(entry.insert(bundle))
            }
        }
    }

    /// Bundle for `language` if it was already loaded.
    #[must_use]
    pub fn get(&self, language: &LanguageIdentifier) -> Option<&TranslationBundle> {
        self.loaded.get(language)
    }

    #[must_use]
    pub fn is_loaded(&self, language: &LanguageIdentifier) -> bool {
        self.loaded.contains_key(language)
    }

    /// Number of bundles parsed so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.load_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn langid(tag: &str) -> LanguageIdentifier {
        tag.parse().unwrap()
    }

    #[test]
    fn embedded_resources_cover_default_languages() {
        let available = BundleSource::Embedded.available().unwrap();
        for tag in crate::config::DEFAULT_SUPPORTED_LANGUAGES {
            assert!(available.contains(&langid(tag)), "missing {tag}");
        }
    }

    #[test]
    fn embedded_english_says_hello() {
        let mut store = BundleStore::embedded();
        let bundle = store.get_or_load(&langid("en")).unwrap();
        assert_eq!(bundle.format("hello", None), "Hello");
    }

    #[test]
    fn interpolates_arguments_without_isolation_marks() {
        let mut store = BundleStore::embedded();
        let bundle = store.get_or_load(&langid("fr")).unwrap();
        let args = TranslationArgs::new().with("name", "Ada");
        assert_eq!(bundle.format("greeting", Some(&args)), "Bonjour, Ada !");
    }

    #[test]
    fn isolation_marks_are_opt_in() {
        let mut store = BundleStore::new(BundleSource::Embedded, true);
        let bundle = store.get_or_load(&langid("en")).unwrap();
        let args = TranslationArgs::new().with("name", "Ada");
        assert_eq!(
            bundle.format("greeting", Some(&args)),
            "Hello, \u{2068}Ada\u{2069}!"
        );
    }

    #[test]
    fn missing_key_returns_marker() {
        let mut store = BundleStore::embedded();
        let bundle = store.get_or_load(&langid("it")).unwrap();
        assert_eq!(bundle.format("no-such-key", None), "MISSING: no-such-key");
        assert!(!bundle.has_key("no-such-key"));
    }

    #[test]
    fn repeated_loads_parse_once() {
        let mut store = BundleStore::embedded();
        store.get_or_load(&langid("ar")).unwrap();
        store.get_or_load(&langid("ar")).unwrap();
        assert_eq!(store.load_count(), 1);
        assert!(store.is_loaded(&langid("ar")));
        assert!(!store.is_loaded(&langid("fr")));
    }

    #[test]
    fn validate_rejects_unpackaged_language() {
        let store = BundleStore::embedded();
        let supported = SupportedLanguages::parse(["en", "de"]).unwrap();
        assert_eq!(
            store.validate(&supported),
            Err(Error::MissingBundle("de".to_string()))
        );
    }

    #[test]
    fn directory_source_requires_fallback_bundle() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("fr.ftl"), "hello = Bonjour\n").unwrap();
        let store = BundleStore::new(BundleSource::Directory(dir.path().to_path_buf()), false);
        let supported = SupportedLanguages::parse(["fr"]).unwrap();

        assert_eq!(
            store.validate(&supported),
            Err(Error::MissingBundle("en".to_string()))
        );
    }

    #[test]
    fn directory_source_loads_files() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("en.ftl"), "hello = Hi there\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let source = BundleSource::Directory(dir.path().to_path_buf());

        assert_eq!(source.available().unwrap(), vec![langid("en")]);

        let mut store = BundleStore::new(source, false);
        let bundle = store.get_or_load(&langid("en")).unwrap();
        assert_eq!(bundle.format("hello", None), "Hi there");
    }

    #[test]
    fn broken_ftl_is_a_bundle_error() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("en.ftl"), "hello = {\n").unwrap();
        let mut store = BundleStore::new(BundleSource::Directory(dir.path().to_path_buf()), false);

        let err = store.get_or_load(&langid("en")).unwrap_err();
        assert!(matches!(err, Error::Bundle { ref language, .. } if language == "en"));
        assert_eq!(store.load_count(), 0);
    }
}
