use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The unit click offsets and annotation ranges are counted in.
///
/// Rust callers usually think in `char`s; Android text layout reports
/// UTF-16 code unit offsets, which differ for characters outside the BMP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextUnit {
    /// Unicode scalar values.
    #[default]
    Chars,
    /// UTF-16 code units.
    Utf16,
}

impl TextUnit {
    /// Length of `s` in this unit.
    #[must_use]
    pub fn len(self, s: &str) -> usize {
        match self {
            TextUnit::Chars => s.chars().count(),
            TextUnit::Utf16 => s.encode_utf16().count(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextUnit::Chars => "chars",
            TextUnit::Utf16 => "utf16",
        }
    }
}

impl fmt::Display for TextUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown text unit {name:?} (expected \"chars\" or \"utf16\")")]
pub struct ParseTextUnitError {
    pub name: String,
}

impl FromStr for TextUnit {
    type Err = ParseTextUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chars" => Ok(TextUnit::Chars),
            "utf16" => Ok(TextUnit::Utf16),
            other => Err(ParseTextUnitError {
                name: other.to_string(),
            }),
        }
    }
}
