//! Indexed items.

use serde::{Deserialize, Serialize};

use crate::{CoercionError, Field, FieldValue, IndexError};

/// An item being indexed or returned as a search result.
///
/// Fields keep their insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier, unique within the index.
    pub id: String,
    /// The datasource the item comes from, e.g. `entity:node`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    /// Fields in insertion order.
    #[serde(default)]
    fields: Vec<Field>,
}

impl Item {
    /// Creates an item without fields.
    pub fn new(id: impl Into<String>, datasource: Option<&str>) -> Self {
        Self {
            id: id.into(),
            datasource: datasource.map(str::to_string),
            fields: Vec::new(),
        }
    }

    /// Adds a field and returns the item, for building items in one expression.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.set_field(field);
        self
    }

    /// Returns the item's datasource.
    pub fn datasource(&self) -> Option<&str> {
        self.datasource.as_deref()
    }

    /// Returns the field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the field with the given name for modification.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    /// Returns all fields in order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Sets a field, replacing an existing one with the same name in place.
    pub fn set_field(&mut self, field: Field) {
        match self.field_mut(field.name()) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Removes a field, returning it if present.
    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        let position = self.fields.iter().position(|f| f.name() == name)?;
        Some(self.fields.remove(position))
    }

    /// Returns the values of a field; absent fields have no values.
    pub fn values(&self, name: &str) -> &[FieldValue] {
        self.field(name).map(Field::values).unwrap_or_default()
    }

    /// Replaces the values of an existing field.
    ///
    /// Returns the values that could not be coerced to the field type.
    pub fn set_values(
        &mut self,
        name: &str,
        values: Vec<FieldValue>,
    ) -> Result<Vec<CoercionError>, IndexError> {
        let id = self.id.clone();
        let field = self.field_mut(name).ok_or_else(|| IndexError::FieldNotFound {
            item: id,
            field: name.to_string(),
        })?;
        Ok(field.set_values(values))
    }
}
