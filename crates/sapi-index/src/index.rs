//! Index definitions: declared fields and aggregation rules.

use std::{fmt, str::FromStr};

use sapi_config::Config;

use crate::{AggregationMode, FieldType, IndexError};

/// A reference to a source field, optionally qualified by datasource.
///
/// Written as `datasource/field` (split at the first `/`) or just `field` for
/// general fields that apply to every datasource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef {
    /// Datasource qualifier, `None` for general fields.
    pub datasource: Option<String>,
    /// Field name on the item.
    pub field: String,
}

impl SourceRef {
    /// Creates a general reference.
    pub fn general(field: impl Into<String>) -> Self {
        Self {
            datasource: None,
            field: field.into(),
        }
    }

    /// Creates a datasource-qualified reference.
    pub fn qualified(datasource: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            datasource: Some(datasource.into()),
            field: field.into(),
        }
    }

    /// Returns true if this source is eligible for an item from `datasource`.
    pub fn applies_to(&self, datasource: Option<&str>) -> bool {
        match &self.datasource {
            None => true,
            Some(own) => datasource == Some(own.as_str()),
        }
    }
}

impl FromStr for SourceRef {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || IndexError::InvalidSourceRef(s.to_string());
        match s.split_once('/') {
            Some((datasource, field)) if !datasource.is_empty() && !field.is_empty() => {
                Ok(Self::qualified(datasource, field))
            }
            Some(_) => Err(invalid()),
            None if s.is_empty() => Err(invalid()),
            None => Ok(Self::general(s)),
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.datasource {
            Some(datasource) => write!(f, "{datasource}/{}", self.field),
            None => f.write_str(&self.field),
        }
    }
}

/// A field declared on the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field identifier.
    pub id: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Datasource the field belongs to, `None` for general fields.
    pub datasource: Option<String>,
    /// Declared type, already resolved against the supported types.
    ///
    /// Aggregated fields may leave this unset and take their mode's default.
    pub field_type: Option<FieldType>,
}

/// A rule computing a derived field from source fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRule {
    /// Identifier of the derived field.
    pub field_id: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// How source values are combined.
    pub mode: AggregationMode,
    /// Source fields in declaration order.
    pub sources: Vec<SourceRef>,
}

/// The definition of a search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index identifier.
    pub id: String,
    /// Declared fields in order.
    pub fields: Vec<FieldDef>,
    /// Aggregation rules in order.
    pub rules: Vec<AggregationRule>,
    /// Field types the backend supports natively.
    pub supported_types: Vec<FieldType>,
}

impl Index {
    /// Builds an index definition from configuration.
    ///
    /// Type and mode names are parsed here; declared field types are resolved
    /// through the fallback chain against the supported types.
    pub fn from_config(config: &Config) -> Result<Self, IndexError> {
        let supported_types = config
            .index
            .supported_types
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<FieldType>, _>>()?;

        let fields = config
            .fields
            .iter()
            .map(|f| {
                let field_type = f
                    .field_type
                    .as_deref()
                    .map(str::parse::<FieldType>)
                    .transpose()?
                    .map(|ty| ty.resolve(&supported_types));
                Ok(FieldDef {
                    id: f.id.clone(),
                    label: f.label.clone(),
                    datasource: f.datasource.clone(),
                    field_type,
                })
            })
            .collect::<Result<Vec<_>, IndexError>>()?;

        let rules = config
            .aggregations
            .iter()
            .map(|a| {
                Ok(AggregationRule {
                    field_id: a.field.clone(),
                    label: a.label.clone(),
                    mode: a.mode.parse()?,
                    sources: a
                        .sources
                        .iter()
                        .map(|s| s.parse())
                        .collect::<Result<_, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, IndexError>>()?;

        Ok(Self {
            id: config.index.id.clone(),
            fields,
            rules,
            supported_types,
        })
    }

    /// Returns the declared field with the given id.
    pub fn field(&self, id: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Returns true if the index declares the field.
    pub fn has_field(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    /// Checks that every rule source names a declared field.
    ///
    /// A qualified source also requires the declared field to belong to that
    /// datasource.
    pub fn validate(&self) -> Result<(), IndexError> {
        for rule in &self.rules {
            for source in &rule.sources {
                let declared = self.fields.iter().any(|f| {
                    f.id == source.field
                        && (source.datasource.is_none() || f.datasource == source.datasource)
                });
                if !declared {
                    return Err(IndexError::UnknownSourceField {
                        field: rule.field_id.clone(),
                        reference: source.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sapi_config::{AggregationSettings, FieldSettings};

    use super::*;

    fn field(id: &str, ty: Option<&str>, datasource: Option<&str>) -> FieldSettings {
        FieldSettings {
            id: id.into(),
            label: None,
            field_type: ty.map(str::to_string),
            datasource: datasource.map(str::to_string),
        }
    }

    fn config() -> Config {
        Config {
            fields: vec![
                field("title", Some("text"), Some("entity:node")),
                field("name", Some("string"), Some("entity:user")),
                field("label", None, None),
            ],
            aggregations: vec![AggregationSettings {
                field: "label".into(),
                label: None,
                mode: "union".into(),
                sources: vec!["entity:node/title".into(), "entity:user/name".into()],
            }],
            ..Config::default()
        }
    }

    #[test]
    fn source_ref_parsing() {
        assert_eq!(
            "entity:node/title".parse::<SourceRef>().unwrap(),
            SourceRef::qualified("entity:node", "title")
        );
        assert_eq!(
            "entity:node/field/sub".parse::<SourceRef>().unwrap(),
            SourceRef::qualified("entity:node", "field/sub")
        );
        assert_eq!("title".parse::<SourceRef>().unwrap(), SourceRef::general("title"));
        assert!("/title".parse::<SourceRef>().is_err());
        assert!("entity:node/".parse::<SourceRef>().is_err());
        assert!("".parse::<SourceRef>().is_err());
    }

    #[test]
    fn source_ref_display_round_trips() {
        for id in ["entity:node/title", "title"] {
            assert_eq!(id.parse::<SourceRef>().unwrap().to_string(), id);
        }
    }

    #[test]
    fn applies_to_datasource() {
        let qualified = SourceRef::qualified("entity:node", "title");
        assert!(qualified.applies_to(Some("entity:node")));
        assert!(!qualified.applies_to(Some("entity:user")));
        assert!(!qualified.applies_to(None));
        assert!(SourceRef::general("title").applies_to(Some("entity:user")));
    }

    #[test]
    fn from_config_builds_index() {
        let index = Index::from_config(&config()).unwrap();
        assert_eq!(index.id, "default");
        assert_eq!(index.fields.len(), 3);
        assert_eq!(index.field("title").unwrap().field_type, Some(FieldType::Text));
        assert_eq!(index.field("label").unwrap().field_type, None);
        assert_eq!(index.rules[0].mode, AggregationMode::Union);
        assert_eq!(index.rules[0].sources.len(), 2);
        assert!(index.validate().is_ok());
    }

    #[test]
    fn from_config_resolves_unsupported_types() {
        let mut config = config();
        config.index.supported_types = vec!["string".into()];
        let index = Index::from_config(&config).unwrap();
        assert_eq!(index.field("title").unwrap().field_type, Some(FieldType::String));
    }

    #[test]
    fn from_config_rejects_bad_names() {
        let mut bad_type = config();
        bad_type.fields[0].field_type = Some("date".into());
        assert_eq!(
            Index::from_config(&bad_type).unwrap_err(),
            IndexError::InvalidFieldType("date".into())
        );

        let mut bad_mode = config();
        bad_mode.aggregations[0].mode = "median".into();
        assert_eq!(
            Index::from_config(&bad_mode).unwrap_err(),
            IndexError::InvalidAggregationMode("median".into())
        );
    }

    #[test]
    fn validate_rejects_unknown_sources() {
        let mut config = config();
        config.aggregations[0].sources.push("entity:node/name".into());
        let index = Index::from_config(&config).unwrap();
        assert_eq!(
            index.validate().unwrap_err(),
            IndexError::UnknownSourceField {
                field: "label".into(),
                reference: "entity:node/name".into()
            }
        );
    }
}
