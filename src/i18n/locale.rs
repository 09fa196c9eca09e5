// SPDX-License-Identifier: MPL-2.0
//! Locale value types shared by resolution, bundles and the screen.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use unic_langid::{CharacterDirection, LanguageIdentifier};

// =============================================================================
// TextDirection
// =============================================================================

/// Layout direction applied to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Direction of the script used by `langid`.
    #[must_use]
    pub fn of(langid: &LanguageIdentifier) -> Self {
        match langid.character_direction() {
            CharacterDirection::RTL => TextDirection::Rtl,
            _ => TextDirection::Ltr,
        }
    }

    #[must_use]
    pub fn from_rtl(is_rtl: bool) -> Self {
        if is_rtl {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    #[must_use]
    pub fn is_rtl(self) -> bool {
        matches!(self, TextDirection::Rtl)
    }

    /// Translation key naming this direction.
    #[must_use]
    pub fn i18n_key(self) -> &'static str {
        match self {
            TextDirection::Ltr => "layout-direction-ltr",
            TextDirection::Rtl => "layout-direction-rtl",
        }
    }
}

// =============================================================================
// LocaleDescriptor
// =============================================================================

/// A device-reported locale preference (language, optional script and region).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleDescriptor(LanguageIdentifier);

impl LocaleDescriptor {
    #[must_use]
    pub fn new(langid: LanguageIdentifier) -> Self {
        Self(langid)
    }

    /// Parses a BCP 47 tag. POSIX forms such as `fr_FR.UTF-8` are accepted.
    pub fn parse(tag: &str) -> Result<Self> {
        let normalized = tag.split(['.', '@']).next().unwrap_or(tag).replace('_', "-");
        normalized
            .parse::<LanguageIdentifier>()
            .map(Self)
            .map_err(|_| Error::InvalidLanguageTag(tag.to_string()))
    }

    /// Parses every tag in `tags`, skipping the ones that are not valid.
    pub fn parse_all<I, S>(tags: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .filter_map(|tag| match Self::parse(tag.as_ref()) {
                Ok(locale) => Some(locale),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping device locale");
                    None
                }
            })
            .collect()
    }

    #[must_use]
    pub fn langid(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// The full tag, e.g. `ar-SA`.
    #[must_use]
    pub fn language_tag(&self) -> String {
        self.0.to_string()
    }

    /// The bare language subtag as an identifier, e.g. `ar`.
    #[must_use]
    pub fn language_only(&self) -> LanguageIdentifier {
        LanguageIdentifier::from_parts(self.0.language, None, None, &[])
    }

    /// The `language-Script` identifier, when a script is present.
    #[must_use]
    pub fn language_with_script(&self) -> Option<LanguageIdentifier> {
        self.0
            .script
            .map(|script| LanguageIdentifier::from_parts(self.0.language, Some(script), None, &[]))
    }

    /// `language-Script` when a script is present, the bare language otherwise.
    #[must_use]
    pub fn partial_tag(&self) -> LanguageIdentifier {
        self.language_with_script().unwrap_or_else(|| self.language_only())
    }

    #[must_use]
    pub fn direction(&self) -> TextDirection {
        TextDirection::of(&self.0)
    }
}

impl FromStr for LocaleDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LocaleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// SupportedLanguages
// =============================================================================

/// Ordered, immutable set of languages with packaged translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages(Vec<LanguageIdentifier>);

impl SupportedLanguages {
    /// Parses `tags`, dropping duplicates while keeping first-seen order.
    pub fn parse<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut languages: Vec<LanguageIdentifier> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref();
            let langid = tag
                .parse::<LanguageIdentifier>()
                .map_err(|_| Error::InvalidLanguageTag(tag.to_string()))?;
            if !languages.contains(&langid) {
                languages.push(langid);
            }
        }
        Ok(Self(languages))
    }

    #[must_use]
    pub fn contains(&self, langid: &LanguageIdentifier) -> bool {
        self.0.contains(langid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageIdentifier> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// ActiveLocale
// =============================================================================

/// The language currently selected for translation and its layout direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLocale {
    pub language: LanguageIdentifier,
    pub direction: TextDirection,
}

impl ActiveLocale {
    #[must_use]
    pub fn new(language: LanguageIdentifier, direction: TextDirection) -> Self {
        Self {
            language,
            direction,
        }
    }

    #[must_use]
    pub fn is_rtl(&self) -> bool {
        self.direction.is_rtl()
    }
}

impl fmt::Display for ActiveLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.language, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arabic_is_right_to_left() {
        let locale = LocaleDescriptor::parse("ar-SA").unwrap();
        assert_eq!(locale.direction(), TextDirection::Rtl);
    }

    #[test]
    fn latin_languages_are_left_to_right() {
        for tag in ["en-GB", "fr", "it-IT", "de-DE"] {
            let locale = LocaleDescriptor::parse(tag).unwrap();
            assert_eq!(locale.direction(), TextDirection::Ltr, "{tag}");
        }
    }

    #[test]
    fn posix_locale_strings_are_normalized() {
        let locale = LocaleDescriptor::parse("fr_FR.UTF-8").unwrap();
        assert_eq!(locale.language_tag(), "fr-FR");
    }

    #[test]
    fn invalid_tag_is_reported() {
        let err = LocaleDescriptor::parse("not a tag!").unwrap_err();
        assert!(matches!(err, Error::InvalidLanguageTag(_)));
    }

    #[test]
    fn partial_tags_are_derived_from_parts() {
        let locale = LocaleDescriptor::parse("zh-Hant-TW").unwrap();
        assert_eq!(locale.language_only().to_string(), "zh");
        assert_eq!(
            locale.language_with_script().map(|id| id.to_string()),
            Some("zh-Hant".to_string())
        );

        assert_eq!(locale.partial_tag().to_string(), "zh-Hant");

        let plain = LocaleDescriptor::parse("en-GB").unwrap();
        assert!(plain.language_with_script().is_none());
        assert_eq!(plain.partial_tag().to_string(), "en");
    }

    #[test]
    fn parse_all_skips_garbage() {
        let locales = LocaleDescriptor::parse_all(["en-US", "??", "it"]);
        let tags: Vec<_> = locales.iter().map(LocaleDescriptor::language_tag).collect();
        assert_eq!(tags, vec!["en-US", "it"]);
    }

    #[test]
    fn supported_languages_keep_order_and_drop_duplicates() {
        let supported = SupportedLanguages::parse(["ar", "en", "fr", "en", "it"]).unwrap();
        let tags: Vec<_> = supported.iter().map(ToString::to_string).collect();
        assert_eq!(tags, vec!["ar", "en", "fr", "it"]);
    }

    #[test]
    fn supported_languages_reject_invalid_tags() {
        assert!(SupportedLanguages::parse(["en", "!!"]).is_err());
    }

    #[test]
    fn direction_keys_are_distinct() {
        assert_ne!(TextDirection::Ltr.i18n_key(), TextDirection::Rtl.i18n_key());
        assert!(TextDirection::from_rtl(true).is_rtl());
        assert!(!TextDirection::default().is_rtl());
    }
}
