// SPDX-License-Identifier: MPL-2.0
//! Named translation parameters.
//!
//! Parameters are kept sorted by name, so two argument sets built in a
//! different insertion order serialize to the same canonical string.
//! Non-finite numbers serialize as `{"nonFinite": "NaN"}` (or `"inf"`, `"-inf"`),
//! which no text or finite number can produce.

use fluent_bundle::{FluentArgs, FluentValue};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Number(f64),
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ArgValue::Text(text) => serializer.serialize_str(text),
            ArgValue::Number(number) if number.is_finite() => serializer.serialize_f64(*number),
            ArgValue::Number(number) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("nonFinite", &number.to_string())?;
                map.end()
            }
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<i64> for ArgValue {
    // Counts shown to users stay far below 2^53.
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        ArgValue::Number(value as f64)
    }
}

/// Named parameters passed to a translation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TranslationArgs(BTreeMap<String, ArgValue>);

impl TranslationArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Parses a `name=value` pair; values that read as numbers become numbers.
    #[must_use]
    pub fn parse_pair(pair: &str) -> Option<(String, ArgValue)> {
        let (name, raw) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => ArgValue::Number(number),
            _ => ArgValue::Text(raw.to_string()),
        };
        Some((name.to_string(), value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Deterministic serialization used to build memo keys.
    #[must_use]
    pub fn canonical(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    /// Borrows the parameters as Fluent arguments.
    #[must_use]
    pub fn to_fluent(&self) -> FluentArgs<'_> {
        let mut args = FluentArgs::new();
        for (name, value) in &self.0 {
            let value = match value {
                ArgValue::Text(text) => FluentValue::from(text.as_str()),
                ArgValue::Number(number) => FluentValue::from(*number),
            };
            args.set(name.as_str(), value);
        }
        args
    }
}

impl<K, V> FromIterator<(K, V)> for TranslationArgs
where
    K: Into<String>,
    V: Into<ArgValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = Self::new();
        for (name, value) in iter {
            args.set(name, value);
        }
        args
    }
}
