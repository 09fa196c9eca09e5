// SPDX-License-Identifier: MPL-2.0
//! `locale_lens` resolves the display language from a device's preferred
//! locales and serves memoized Fluent translations for it.
//!
//! The [`i18n`] module holds the locale context and its collaborators, and
//! [`screen`] renders a read-only inspection view on top of them.

#![doc(html_root_url = "https://docs.rs/locale_lens/0.1.0")]

pub mod config;
pub mod error;
pub mod i18n;
pub mod paths;
pub mod screen;
