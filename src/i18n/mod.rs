// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support.
//!
//! This module resolves the display language from the device's preferred
//! locales and serves memoized translations from Fluent bundles.
//!
//! # Features
//!
//! - Best-available-language matching with a fixed English fallback
//! - Lazy, validated loading of embedded or on-disk `.ftl` resources
//! - Memoized lookups that are invalidated on every re-resolution
//! - Scoped subscriptions to device locale changes

pub mod args;
pub mod bundle;
pub mod cache;
pub mod context;
pub mod listener;
pub mod locale;
pub mod resolver;
pub mod source;

pub use args::{ArgValue, TranslationArgs};
pub use bundle::{BundleSource, BundleStore, TranslationBundle};
pub use cache::{canonical_key, CacheStats, TranslationCache};
pub use context::LocaleContext;
pub use listener::{ChangeSignal, LocaleChangeListener, PendingResolve};
pub use locale::{ActiveLocale, LocaleDescriptor, SupportedLanguages, TextDirection};
pub use resolver::{find_best_available_language, LanguageMatch};
pub use source::{ListenerId, LocaleSource, StaticLocaleSource, SystemLocaleSource};
