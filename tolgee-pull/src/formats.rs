//! The output formats tolgee-pull can produce.
//!
//! This module re-exports the document type of each format and provides the
//! [`OutputFormat`] enum used to pick one at run time.

pub mod android_strings;
pub mod json;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

// Reexporting the formats for easier access
pub use android_strings::Format as AndroidStringsFormat;
pub use json::Format as JsonFormat;

use crate::{Error, traits::Parser, types::Catalog};

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON with nulls replaced by empty strings.
    Json,
    /// Android `strings.xml` resource document.
    #[default]
    AndroidStrings,
}

/// Implements [`std::fmt::Display`] for [`OutputFormat`].
///
/// ```rust
/// use tolgee_pull::OutputFormat;
/// assert_eq!(OutputFormat::Json.to_string(), "json");
/// assert_eq!(OutputFormat::AndroidStrings.to_string(), "xml");
/// ```
impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::AndroidStrings => write!(f, "xml"),
        }
    }
}

/// Implements [`std::str::FromStr`] for [`OutputFormat`].
///
/// Accepts (case-insensitive) `"json"` and `"xml"`/`"android"`. Anything else is
/// an [`Error::UnsupportedFormat`].
///
/// ```rust
/// use std::str::FromStr;
/// use tolgee_pull::OutputFormat;
/// assert_eq!(OutputFormat::from_str("XML").unwrap(), OutputFormat::AndroidStrings);
/// assert!(OutputFormat::from_str("yaml").is_err());
/// ```
impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "xml" | "android" | "androidstrings" => Ok(OutputFormat::AndroidStrings),
            other => Err(Error::UnsupportedFormat(format!(
                "`{}` (supported: json, xml)",
                other
            ))),
        }
    }
}

impl OutputFormat {
    /// All formats, in the order they are listed to users.
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::AndroidStrings];

    /// Returns the file extension written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::AndroidStrings => "xml",
        }
    }

    /// Serializes one catalog into this format.
    pub fn transform(&self, catalog: &Catalog) -> Result<String, Error> {
        match self {
            OutputFormat::Json => JsonFormat::from(catalog).render(),
            OutputFormat::AndroidStrings => AndroidStringsFormat::from(catalog).render(),
        }
    }
}
