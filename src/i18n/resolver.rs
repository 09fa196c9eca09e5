// SPDX-License-Identifier: MPL-2.0
//! Best-available-language matching.
//!
//! Device locales are visited in preference order. For each one the first hit wins:
//!
//! 1. the full tag (`en-GB`)
//! 2. the partial tag: `language-Script` (`zh-Hant`) when the locale carries a
//!    script, the bare language (`en`) otherwise
//! 3. the bare language (`zh`), for locales that carry a script
//!
//! Steps 2 and 3 are skipped while the next device locale has the same partial
//! tag (or language), so `["en-GB", "en-US"]` picks a supported `en-US` over `en`.
//!
//! The direction reported with a match is the one of the device locale that produced it.
//! When nothing matches, callers fall back to [`fallback_match`].

use super::locale::{LocaleDescriptor, SupportedLanguages, TextDirection};
use crate::config::FALLBACK_LANGUAGE;
use unic_langid::LanguageIdentifier;

/// A supported language picked for a device locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMatch {
    pub language: LanguageIdentifier,
    pub direction: TextDirection,
}

impl LanguageMatch {
    #[must_use]
    pub fn is_rtl(&self) -> bool {
        self.direction.is_rtl()
    }
}

/// Returns the best supported language for `preferred`, or `None` when no
/// device locale is compatible with any supported language.
#[must_use]
pub fn find_best_available_language(
    preferred: &[LocaleDescriptor],
    supported: &SupportedLanguages,
) -> Option<LanguageMatch> {
    preferred.iter().enumerate().find_map(|(index, locale)| {
        let next = preferred.get(index + 1);
        let found = if supported.contains(locale.langid()) {
            Some(locale.langid().clone())
        } else {
            let partial = locale.partial_tag();
            let partial = (next.map(LocaleDescriptor::partial_tag).as_ref() != Some(&partial))
                .then_some(partial);
            let language = locale
                .langid()
                .script
                .is_some()
                .then(|| locale.language_only())
                .filter(|tag| next.map(LocaleDescriptor::language_only).as_ref() != Some(tag));
            [partial, language]
                .into_iter()
                .flatten()
                .find(|candidate| supported.contains(candidate))
        };
        found.map(|language| LanguageMatch {
            language,
            direction: locale.direction(),
        })
    })
}

/// The fixed default used when nothing matches: English, left to right.
#[must_use]
pub fn fallback_match() -> LanguageMatch {
    LanguageMatch {
        language: FALLBACK_LANGUAGE
            .parse::<LanguageIdentifier>()
            .unwrap_or_default(),
        direction: TextDirection::Ltr,
    }
}

/// Resolves `preferred` against `supported`, applying the fallback.
#[must_use]
pub fn resolve(preferred: &[LocaleDescriptor], supported: &SupportedLanguages) -> LanguageMatch {
    match find_best_available_language(preferred, supported) {
        Some(found) => found,
        None => {
            tracing::debug!(
                preferred = ?preferred.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "no supported language matched, using fallback"
            );
            fallback_match()
        }
    }
}

/// Puts `language` in front of `device`, so an explicit choice is tried first.
#[must_use]
pub fn with_override(
    language: Option<&LocaleDescriptor>,
    device: Vec<LocaleDescriptor>,
) -> Vec<LocaleDescriptor> {
    match language {
        Some(first) => std::iter::once(first.clone()).chain(device).collect(),
        None => device,
    }
}
