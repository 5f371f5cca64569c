//! Typed item fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CoercionError, FieldType, FieldValue, IndexError};

/// A named field of an item holding values of one type.
///
/// The type is fixed at creation. Every value added goes through
/// [`FieldValue::coerce`], so the stored values always conform to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawField")]
pub struct Field {
    /// Field name (property path on the item).
    name: String,
    /// Data type of every value.
    #[serde(rename = "type")]
    field_type: FieldType,
    /// Values in order.
    values: Vec<FieldValue>,
}

impl Field {
    /// Creates an empty field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            values: Vec::new(),
        }
    }

    /// Creates a field from values, returning the values that could not be coerced.
    pub fn with_values(
        name: impl Into<String>,
        field_type: FieldType,
        values: Vec<FieldValue>,
    ) -> (Self, Vec<CoercionError>) {
        let mut field = Self::new(name, field_type);
        let rejected = field.set_values(values);
        (field, rejected)
    }

    /// Builds a field from values already known to conform to `field_type`.
    pub(crate) fn from_conforming(
        name: impl Into<String>,
        field_type: FieldType,
        values: Vec<FieldValue>,
    ) -> Self {
        debug_assert!(values.iter().all(|v| v.field_type() == field_type));
        Self {
            name: name.into(),
            field_type,
            values,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the values in order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Appends a value, coercing it to the field type.
    pub fn push(&mut self, value: FieldValue) -> Result<(), CoercionError> {
        let value = value.coerce(self.field_type)?;
        self.values.push(value);
        Ok(())
    }

    /// Replaces all values, returning the ones that could not be coerced.
    pub fn set_values(&mut self, values: Vec<FieldValue>) -> Vec<CoercionError> {
        self.values.clear();
        values
            .into_iter()
            .filter_map(|value| self.push(value).err())
            .collect()
    }

    /// Returns true if the field holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Wire form of a field; the type may be omitted and is then inferred from the first value.
#[derive(Deserialize)]
struct RawField {
    /// Field name.
    name: String,
    /// Declared type.
    #[serde(rename = "type", default)]
    field_type: Option<FieldType>,
    /// Untyped JSON values.
    #[serde(default)]
    values: Vec<Value>,
}

impl TryFrom<RawField> for Field {
    type Error = IndexError;

    fn try_from(raw: RawField) -> Result<Self, Self::Error> {
        let field_type = raw
            .field_type
            .or_else(|| raw.values.first().and_then(FieldValue::infer_type))
            .unwrap_or(FieldType::String);

        let values = raw
            .values
            .iter()
            .map(|json| FieldValue::from_json(json, field_type))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| IndexError::InvalidJson(format!("field {}: {err}", raw.name)))?;

        Ok(Self::from_conforming(raw.name, field_type, values))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tokenize;

    #[test]
    fn push_coerces() {
        let mut field = Field::new("count", FieldType::Integer);
        field.push(FieldValue::String("3".into())).unwrap();
        assert_eq!(field.values(), &[FieldValue::Integer(3)]);
        assert!(field.push(FieldValue::String("three".into())).is_err());
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn with_values_reports_rejects() {
        let (field, rejected) = Field::with_values(
            "n",
            FieldType::Decimal,
            vec![
                FieldValue::Integer(1),
                FieldValue::Text("x".into()),
                FieldValue::Text("2.5".into()),
            ],
        );
        assert_eq!(
            field.values(),
            &[FieldValue::Decimal(1.0), FieldValue::Decimal(2.5)]
        );
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].value, "x");
    }

    #[test]
    fn deserialize_with_declared_type() {
        let field: Field = serde_json::from_value(json!({
            "name": "body",
            "type": "tokenized_text",
            "values": ["foo bar baz"]
        }))
        .unwrap();
        assert_eq!(field.field_type(), FieldType::TokenizedText);
        assert_eq!(field.values(), &[FieldValue::Tokens(tokenize("foo bar baz"))]);
    }

    #[test]
    fn deserialize_infers_type() {
        let field: Field = serde_json::from_value(json!({"name": "n", "values": [2, 4]})).unwrap();
        assert_eq!(field.field_type(), FieldType::Integer);

        let empty: Field = serde_json::from_value(json!({"name": "e"})).unwrap();
        assert_eq!(empty.field_type(), FieldType::String);
        assert!(empty.is_empty());
    }

    #[test]
    fn deserialize_rejects_bad_value() {
        let err = serde_json::from_value::<Field>(json!({
            "name": "n",
            "type": "integer",
            "values": ["abc"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("field n"));
    }

    #[test]
    fn serializes_with_type() {
        let (field, _) = Field::with_values("t", FieldType::Text, vec![FieldValue::Text("a".into())]);
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"name": "t", "type": "text", "values": ["a"]})
        );
    }
}
