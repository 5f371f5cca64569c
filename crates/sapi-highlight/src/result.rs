//! Search result sets as seen by result processors.

use std::collections::BTreeMap;

use sapi_index::Item;
use sapi_keys::KeysNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Highlighted field values: item id, then field name, then values in order.
pub type HighlightedFields = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// One item of a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// The matched item.
    pub item: Item,
    /// Relevance score.
    #[serde(default)]
    pub score: f64,
    /// Excerpt showing where the keywords occur.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl ResultItem {
    /// Wraps an item with a zero score and no excerpt.
    pub fn new(item: Item) -> Self {
        Self {
            item,
            score: 0.0,
            excerpt: None,
        }
    }
}

/// Data attached to a result set by processors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraData {
    /// Highlighted field values, set by the highlighter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_fields: Option<HighlightedFields>,
    /// Everything else, kept as given.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// The results of one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// The parsed keys of the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<KeysNode>,
    /// Total number of results, which may exceed the items returned.
    pub result_count: usize,
    /// The returned items, in rank order.
    #[serde(default)]
    pub items: Vec<ResultItem>,
    /// Processor output.
    #[serde(default)]
    pub extra: ExtraData,
}

impl ResultSet {
    /// Creates a result set whose count equals the number of items.
    pub fn new(keys: Option<KeysNode>, items: Vec<ResultItem>) -> Self {
        Self {
            keys,
            result_count: items.len(),
            items,
            extra: ExtraData::default(),
        }
    }

    /// Returns the highlighted field values, if a highlighter has run.
    pub fn highlighted_fields(&self) -> Option<&HighlightedFields> {
        self.extra.highlighted_fields.as_ref()
    }
}
