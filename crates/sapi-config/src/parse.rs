//! Configuration file parsing.
//!
//! Parses `.sapi.toml` files into intermediate `RawConfig` structures that
//! preserve the optional nature of all fields before defaults are applied.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::{ConfigError, HighlightMode};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional so that a partial file resolves against defaults.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Index section.
    pub index: Option<RawIndexSettings>,
    /// Field declarations, in index order.
    pub field: Option<Vec<RawField>>,
    /// Aggregation rules.
    pub aggregation: Option<Vec<RawAggregation>>,
    /// Highlight processor section.
    pub highlight: Option<RawHighlightSettings>,
}

/// Raw index settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Index identifier.
    pub id: Option<String>,
    /// Field types supported natively by the backend.
    pub supported_types: Option<Vec<String>>,
}

/// Raw field declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct RawField {
    /// Field identifier.
    pub id: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Declared type name.
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    /// Datasource this field belongs to, if any.
    pub datasource: Option<String>,
}

/// Raw aggregation rule.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct RawAggregation {
    /// Identifier of the derived field.
    pub field: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Aggregation mode name.
    pub mode: String,
    /// Source field references (`datasource/field` or `field`).
    /// Accepts either a single string or an array of strings.
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Raw highlight settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHighlightSettings {
    /// Marker inserted before each match.
    pub prefix: Option<String>,
    /// Marker inserted after each match.
    pub suffix: Option<String>,
    /// Whether to build excerpts.
    pub excerpt: Option<bool>,
    /// Maximum excerpt length in characters.
    pub excerpt_length: Option<usize>,
    /// Whether to highlight field values.
    pub highlight: Option<HighlightMode>,
    /// Match keywords inside words as well.
    pub highlight_partial: Option<bool>,
    /// Fields never highlighted or used for excerpts.
    pub exclude_fields: Option<Vec<String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
///
/// Useful for validating template content (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}
