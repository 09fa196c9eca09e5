// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Explicit language override
//! - `[i18n]` - Translation sources, supported languages and memo capacity
//! - `[watch]` - Device-locale polling for the `--watch` mode
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `LOCALE_LENS_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use locale_lens::config;
//!
//! let (mut config, _warning) = config::load();
//! config.general.language = Some("fr".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// Warning key returned when an existing config file cannot be parsed.
pub const CONFIG_LOAD_WARNING: &str = "notification-config-load-error";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// Language tried before the device preferences (e.g., "fr", "ar-SA").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Translation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct I18nConfig {
    /// Directory of `<tag>.ftl` files used instead of the embedded resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations_dir: Option<PathBuf>,

    /// Languages offered to locale matching, in order.
    #[serde(default = "default_supported")]
    pub supported: Vec<String>,

    /// Wrap interpolated values in Unicode bidi isolation marks.
    #[serde(default)]
    pub use_isolating: bool,

    /// Number of memoized translations kept between locale changes.
    #[serde(
        default = "default_cache_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_capacity: Option<usize>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            translations_dir: None,
            supported: default_supported(),
            use_isolating: false,
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl I18nConfig {
    /// Memo capacity clamped to the accepted range.
    #[must_use]
    pub fn effective_cache_capacity(&self) -> usize {
        self.cache_capacity
            .unwrap_or(DEFAULT_CACHE_CAPACITY)
            .clamp(MIN_CACHE_CAPACITY, MAX_CACHE_CAPACITY)
    }
}

/// Device-locale watch settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchConfig {
    /// Polling period in milliseconds.
    #[serde(
        default = "default_poll_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub poll_interval_ms: Option<u64>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl WatchConfig {
    /// Polling period clamped to the accepted range.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        let millis = self
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        Duration::from_millis(millis)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub i18n: I18nConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_supported() -> Vec<String> {
    DEFAULT_SUPPORTED_LANGUAGES
        .iter()
        .map(|tag| (*tag).to_string())
        .collect()
}

fn default_cache_capacity() -> Option<usize> {
    Some(DEFAULT_CACHE_CAPACITY)
}

fn default_poll_interval_ms() -> Option<u64> {
    Some(DEFAULT_POLL_INTERVAL_MS)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config");
                    return (Config::default(), Some(CONFIG_LOAD_WARNING.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
