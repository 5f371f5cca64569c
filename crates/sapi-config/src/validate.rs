//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::{collections::HashSet, fmt};

use crate::{Config, HighlightMode};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No fields are declared.
    NoFieldsDefined,
    /// The same field id is declared more than once.
    DuplicateField {
        /// The repeated field id.
        field: String,
    },
    /// An aggregation targets a field that is not part of the index.
    AggregatedFieldNotIndexed {
        /// The derived field id.
        field: String,
    },
    /// An aggregation has no source fields.
    AggregationWithoutSources {
        /// The derived field id.
        field: String,
    },
    /// Excerpts are enabled but the excerpt length is zero.
    ZeroExcerptLength,
    /// Highlighting and excerpts are both disabled.
    HighlightProcessorInactive,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFieldsDefined => write!(f, "no fields are defined in configuration"),
            Self::DuplicateField { field } => {
                write!(f, "field '{field}' is declared more than once")
            }
            Self::AggregatedFieldNotIndexed { field } => write!(
                f,
                "aggregated field '{field}' is not declared as an index field and will be skipped"
            ),
            Self::AggregationWithoutSources { field } => {
                write!(f, "aggregated field '{field}' has no source fields")
            }
            Self::ZeroExcerptLength => {
                write!(f, "excerpts are enabled but excerpt_length is 0")
            }
            Self::HighlightProcessorInactive => write!(
                f,
                "highlight = \"never\" and excerpt = false: the highlight processor does nothing"
            ),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.fields.is_empty() {
        warnings.push(ConfigWarning::NoFieldsDefined);
    }

    let mut seen = HashSet::new();
    for field in &config.fields {
        if !seen.insert(field.id.as_str()) {
            warnings.push(ConfigWarning::DuplicateField {
                field: field.id.clone(),
            });
        }
    }

    for rule in &config.aggregations {
        if !seen.contains(rule.field.as_str()) {
            warnings.push(ConfigWarning::AggregatedFieldNotIndexed {
                field: rule.field.clone(),
            });
        }
        if rule.sources.is_empty() {
            warnings.push(ConfigWarning::AggregationWithoutSources {
                field: rule.field.clone(),
            });
        }
    }

    let highlight = &config.highlight;
    if highlight.excerpt && highlight.excerpt_length == 0 {
        warnings.push(ConfigWarning::ZeroExcerptLength);
    }
    if !highlight.excerpt && highlight.highlight == HighlightMode::Never {
        warnings.push(ConfigWarning::HighlightProcessorInactive);
    }

    warnings
}
