// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Io(String),
    Config(String),
    /// A string that does not parse as a BCP 47 language identifier.
    InvalidLanguageTag(String),
    /// A supported language has no translation resource packaged for it.
    ///
    /// This is a packaging defect and is reported once during startup
    /// validation, never from a translation lookup.
    MissingBundle(String),
    /// A translation resource exists but could not be parsed or registered.
    Bundle { language: String, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::InvalidLanguageTag(tag) => write!(f, "Invalid language tag: {}", tag),
            Error::MissingBundle(tag) => {
                write!(f, "No translation bundle packaged for language: {}", tag)
            }
            Error::Bundle { language, message } => {
                write!(f, "Bundle Error ({}): {}", language, message)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
