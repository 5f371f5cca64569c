//! Field data types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::IndexError;

/// The data type of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Unprocessed string.
    String,
    /// Signed integer.
    Integer,
    /// Floating point number.
    Decimal,
    /// Boolean flag.
    Boolean,
    /// Fulltext.
    Text,
    /// Fulltext that has already been split into scored tokens.
    TokenizedText,
}

impl FieldType {
    /// Every field type.
    pub const ALL: [Self; 6] = [
        Self::String,
        Self::Integer,
        Self::Decimal,
        Self::Boolean,
        Self::Text,
        Self::TokenizedText,
    ];

    /// Returns the configuration name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::TokenizedText => "tokenized_text",
        }
    }

    /// Returns true for the fulltext types, which are the ones highlighted.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Text | Self::TokenizedText)
    }

    /// Returns true for types with a numeric representation.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal | Self::Boolean)
    }

    /// Returns the type to use when a backend does not support this one.
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::TokenizedText => Some(Self::Text),
            Self::Text | Self::Decimal | Self::Integer | Self::Boolean => Some(Self::String),
            Self::String => None,
        }
    }

    /// Walks the fallback chain until a supported type is found.
    ///
    /// `String` is always considered supported.
    pub fn resolve(self, supported: &[Self]) -> Self {
        let mut current = self;
        while !supported.contains(&current) {
            match current.fallback() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == name)
            .ok_or_else(|| IndexError::InvalidFieldType(s.to_string()))
    }
}
