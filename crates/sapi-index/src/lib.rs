//! Index items and field aggregation for sapi.
//!
//! This crate models the data a search index works with and computes derived
//! fields on it:
//! - [`FieldType`] and its fallback chain for backends with limited type support
//! - [`FieldValue`], [`Field`] and [`Item`], the typed values of an indexed item
//! - [`Index`], built from configuration, with its [`AggregationRule`]s
//! - [`Aggregator`], which applies aggregation rules to items
//!
//! # Example
//!
//! ```
//! use sapi_index::{
//!     AggregationMode, AggregationRule, Aggregator, Field, FieldDef, FieldType, FieldValue,
//!     Index, Item,
//! };
//!
//! let rule = AggregationRule {
//!     field_id: "total".to_string(),
//!     label: None,
//!     mode: AggregationMode::Sum,
//!     sources: vec!["price".parse().unwrap()],
//! };
//! let index = Index {
//!     id: "shop".to_string(),
//!     fields: vec![
//!         FieldDef { id: "price".into(), label: None, datasource: None, field_type: Some(FieldType::Integer) },
//!         FieldDef { id: "total".into(), label: None, datasource: None, field_type: None },
//!     ],
//!     rules: vec![rule],
//!     supported_types: FieldType::ALL.to_vec(),
//! };
//!
//! let (price, _) = Field::with_values(
//!     "price",
//!     FieldType::Integer,
//!     vec![FieldValue::Integer(3), FieldValue::Integer(4)],
//! );
//! let mut item = Item::new("product/1", None).with_field(price);
//!
//! Aggregator::new(&index).unwrap().aggregate_item(&mut item);
//! assert_eq!(item.values("total"), &[FieldValue::Integer(7)]);
//! ```

#![warn(missing_docs)]

mod aggregate;
mod error;
mod field;
mod index;
mod item;
mod types;
mod value;

pub use aggregate::{
    AggregationMode, AggregationOutcome, AggregationReport, AggregationStatus,
    AggregationWarning, Aggregator, CONCAT_SEPARATOR,
};
pub use error::{CoercionError, IndexError};
pub use field::Field;
pub use index::{AggregationRule, FieldDef, Index, SourceRef};
pub use item::Item;
pub use types::FieldType;
pub use value::{DEFAULT_TOKEN_SCORE, FieldValue, Numeric, Token, tokenize};
