//! Error types for the sapi-index crate.

use thiserror::Error;

use crate::FieldType;

/// Errors that can occur when building an index definition or loading items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Unknown field type name.
    #[error("unknown field type: {0}")]
    InvalidFieldType(String),

    /// Unknown aggregation mode name.
    #[error("unknown aggregation mode: {0}")]
    InvalidAggregationMode(String),

    /// A source reference that is neither `field` nor `datasource/field`.
    #[error("invalid source reference: {0:?}")]
    InvalidSourceRef(String),

    /// An aggregation rule references a field the index does not declare.
    #[error("aggregated field {field} references unknown source field {reference}")]
    UnknownSourceField {
        /// The derived field whose rule is broken.
        field: String,
        /// The combined id of the missing source.
        reference: String,
    },

    /// An operation addressed a field the item does not have.
    #[error("item {item} has no field {field}")]
    FieldNotFound {
        /// The item identifier.
        item: String,
        /// The missing field name.
        field: String,
    },

    /// Item data could not be read from JSON.
    #[error("invalid item data: {0}")]
    InvalidJson(String),
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

/// A value that cannot be represented in the requested field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {value:?} to {target}")]
pub struct CoercionError {
    /// Text rendering of the offending value.
    pub value: String,
    /// The type the value was converted to.
    pub target: FieldType,
}

impl CoercionError {
    /// Creates a coercion error for a value rendering and target type.
    pub fn new(value: impl Into<String>, target: FieldType) -> Self {
        Self {
            value: value.into(),
            target,
        }
    }
}
