//! Configuration system for sapi.
//!
//! sapi reads a TOML file named `.sapi.toml` describing the index (its fields and the
//! aggregation rules that derive new fields from them) and the highlight processor.
//! The nearest file found by walking up from the current directory is used, falling back
//! to `~/.sapi.toml`.

#![warn(missing_docs)]

mod discovery;
mod error;
mod parse;
mod templates;
mod validate;

use std::{
    fmt,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_file, global_config_path};
pub use error::ConfigError;
pub use parse::{
    RawAggregation, RawConfig, RawField, RawHighlightSettings, RawIndexSettings,
    parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::template;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default prefix wrapped around highlighted keywords.
pub const DEFAULT_PREFIX: &str = "<strong>";

/// Default suffix wrapped around highlighted keywords.
pub const DEFAULT_SUFFIX: &str = "</strong>";

/// Default maximum excerpt length, in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 256;

/// Names of every field type, used as the default supported set.
const ALL_TYPES: [&str; 6] = [
    "string",
    "integer",
    "decimal",
    "boolean",
    "text",
    "tokenized_text",
];

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    /// Index settings.
    pub index: IndexSettings,
    /// Field declarations, in index order.
    #[serde(rename = "field", skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSettings>,
    /// Aggregation rules.
    #[serde(rename = "aggregation", skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<AggregationSettings>,
    /// Highlight processor settings.
    pub highlight: HighlightSettings,
    /// The file this configuration was loaded from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration that applies to `cwd`.
    ///
    /// Returns `Ok(Config::default())` if no configuration file is found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        match discover_config_file(cwd) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = parse_config_file(path)?;
        let mut config = Self::from_raw(raw);
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolves a raw configuration, filling in defaults for missing values.
    pub fn from_raw(raw: RawConfig) -> Self {
        let index = raw.index.unwrap_or_default();
        let defaults = IndexSettings::default();
        let index = IndexSettings {
            id: index.id.unwrap_or(defaults.id),
            supported_types: index.supported_types.unwrap_or(defaults.supported_types),
        };

        let fields = raw
            .field
            .unwrap_or_default()
            .into_iter()
            .map(|f| FieldSettings {
                id: f.id,
                label: f.label,
                field_type: f.field_type,
                datasource: f.datasource,
            })
            .collect();

        let aggregations = raw
            .aggregation
            .unwrap_or_default()
            .into_iter()
            .map(|a| AggregationSettings {
                field: a.field,
                label: a.label,
                mode: a.mode,
                sources: a.sources,
            })
            .collect();

        let highlight = raw.highlight.unwrap_or_default();
        let defaults = HighlightSettings::default();
        let highlight = HighlightSettings {
            prefix: highlight.prefix.unwrap_or(defaults.prefix),
            suffix: highlight.suffix.unwrap_or(defaults.suffix),
            excerpt: highlight.excerpt.unwrap_or(defaults.excerpt),
            excerpt_length: highlight.excerpt_length.unwrap_or(defaults.excerpt_length),
            highlight: highlight.highlight.unwrap_or(defaults.highlight),
            highlight_partial: highlight
                .highlight_partial
                .unwrap_or(defaults.highlight_partial),
            exclude_fields: highlight.exclude_fields.unwrap_or(defaults.exclude_fields),
        };

        Self {
            index,
            fields,
            aggregations,
            highlight,
            config_path: None,
        }
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - No fields declared
    /// - Duplicate field ids
    /// - Aggregation rules whose target field is not declared (those rules are skipped)
    /// - Aggregation rules without sources
    /// - Excerpts enabled with a zero length
    /// - Highlighting and excerpts both disabled
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Index-level settings.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSettings {
    /// Index identifier.
    pub id: String,
    /// Field type names supported natively by the backend.
    pub supported_types: Vec<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            id: String::from("default"),
            supported_types: ALL_TYPES.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

/// A field declared on the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSettings {
    /// Field identifier.
    pub id: String,
    /// Human-readable label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Declared type name; aggregated fields may leave it unset.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    /// Datasource this field belongs to, or `None` for general fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
}

/// A rule deriving one field from several source fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationSettings {
    /// Identifier of the derived field.
    pub field: String,
    /// Human-readable label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Aggregation mode name.
    pub mode: String,
    /// Source field references, in declaration order.
    pub sources: Vec<String>,
}

/// Whether matched keywords are wrapped in field values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    /// Highlight every eligible field value.
    #[default]
    Always,
    /// Never highlight field values (excerpts may still be built).
    Never,
}

impl fmt::Display for HighlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

/// Settings for the highlight processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSettings {
    /// Marker inserted before each match.
    pub prefix: String,
    /// Marker inserted after each match.
    pub suffix: String,
    /// Whether to build excerpts.
    pub excerpt: bool,
    /// Maximum excerpt length in characters.
    pub excerpt_length: usize,
    /// Whether to highlight field values.
    pub highlight: HighlightMode,
    /// Match keywords inside words as well.
    pub highlight_partial: bool,
    /// Fields never highlighted or used for excerpts.
    pub exclude_fields: Vec<String>,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            prefix: String::from(DEFAULT_PREFIX),
            suffix: String::from(DEFAULT_SUFFIX),
            excerpt: true,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            highlight: HighlightMode::Always,
            highlight_partial: false,
            exclude_fields: Vec::new(),
        }
    }
}
