//! Keyword highlighting and excerpts for sapi search results.
//!
//! The [`Highlighter`] post-processes a [`ResultSet`]: it wraps occurrences of
//! the query's keywords in the text fields of every result item and builds one
//! excerpt per item showing where the keywords occur.
//!
//! Keywords come from the positive part of the query's search keys; negated
//! keywords are never highlighted. Only text and tokenized-text fields take
//! part.
//!
//! # Example
//!
//! ```
//! use sapi_config::HighlightSettings;
//! use sapi_highlight::{Highlighter, ResultItem, ResultSet};
//! use sapi_index::{Field, FieldType, FieldValue, Item};
//!
//! let (body, _) = Field::with_values(
//!     "body",
//!     FieldType::Text,
//!     vec![FieldValue::Text("Rust is fast".into())],
//! );
//! let item = Item::new("node/1", None).with_field(body);
//! let keys = sapi_keys::parse("rust").unwrap();
//! let mut results = ResultSet::new(keys, vec![ResultItem::new(item)]);
//!
//! Highlighter::new(HighlightSettings::default()).postprocess_search_results(&mut results);
//!
//! let highlighted = &results.highlighted_fields().unwrap()["node/1"]["body"];
//! assert_eq!(highlighted[0], "<strong>Rust</strong> is fast");
//! assert_eq!(results.items[0].excerpt.as_deref(), Some("<strong>Rust</strong> is fast"));
//! ```

#![warn(missing_docs)]

mod error;
mod excerpt;
mod html;
mod matcher;
mod result;

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use sapi_config::{HighlightMode, HighlightSettings};
use sapi_index::{Field, Item};
use sapi_keys::KeysNode;
use tracing::{debug, warn};

pub use error::HighlightError;
pub use excerpt::{CHARS_PER_MATCH, Excerpter, LEADING_ELLIPSIS, SEPARATOR, TRAILING_ELLIPSIS};
pub use html::{
    Segment, collapse_whitespace, decode_entities, escape, plain_text, split_markup, strip_tags,
};
pub use matcher::KeywordMatcher;
pub use result::{ExtraData, HighlightedFields, ResultItem, ResultSet};

/// A problem with one item (or the whole run) that did not stop processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightDiagnostic {
    /// The affected item, `None` when the whole run was affected.
    pub item_id: Option<String>,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for HighlightDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item_id {
            Some(id) => write!(f, "item {id}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Summary of one highlighter run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightReport {
    /// Number of items processed.
    pub items: usize,
    /// Number of fields stored as highlighted.
    pub fields_highlighted: usize,
    /// Number of excerpts attached.
    pub excerpts: usize,
    /// Problems encountered along the way.
    pub diagnostics: Vec<HighlightDiagnostic>,
}

/// Highlights keywords in search results and builds excerpts.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    /// Processor settings.
    settings: HighlightSettings,
}

impl Highlighter {
    /// Creates a highlighter with the given settings.
    pub fn new(settings: HighlightSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &HighlightSettings {
        &self.settings
    }

    /// Highlights the results in place and attaches excerpts.
    ///
    /// Does nothing when there are no results or the keys hold no positive
    /// keyword. Highlighted fields are merged into any already present in the
    /// extra data; entries for other fields are kept. The extra data stays
    /// untouched when no field changed.
    pub fn postprocess_search_results(&self, results: &mut ResultSet) -> HighlightReport {
        let mut report = HighlightReport::default();

        if results.result_count == 0 || results.items.is_empty() {
            debug!("no results, skipping highlighting");
            return report;
        }

        let keywords = results
            .keys
            .as_ref()
            .map(KeysNode::positive_keywords)
            .unwrap_or_default();
        if keywords.is_empty() {
            debug!("no positive keywords, skipping highlighting");
            return report;
        }

        let matcher = match KeywordMatcher::new(&keywords, self.settings.highlight_partial) {
            Ok(matcher) => matcher,
            Err(err) => {
                warn!(error = %err, "cannot build keyword matcher");
                report.diagnostics.push(HighlightDiagnostic {
                    item_id: None,
                    message: err.to_string(),
                });
                return report;
            }
        };

        let store = self.settings.highlight == HighlightMode::Always;
        let mut seen = HashSet::new();

        for result in &mut results.items {
            report.items += 1;

            if !seen.insert(result.item.id.clone()) {
                let diagnostic = HighlightDiagnostic {
                    item_id: Some(result.item.id.clone()),
                    message: String::from("duplicate item id, highlighted fields not stored"),
                };
                warn!(item = %result.item.id, "duplicate item id in result set");
                report.diagnostics.push(diagnostic);
            } else if store {
                let fields = self.highlight_item(&matcher, &result.item);
                if !fields.is_empty() {
                    report.fields_highlighted += fields.len();
                    results
                        .extra
                        .highlighted_fields
                        .get_or_insert_with(BTreeMap::new)
                        .entry(result.item.id.clone())
                        .or_default()
                        .extend(fields);
                }
            }

            if self.settings.excerpt
                && let Some(excerpt) = self.excerpt_item(&matcher, &result.item)
            {
                result.excerpt = Some(excerpt);
                report.excerpts += 1;
            }
        }

        report
    }

    /// Wraps keywords in `text` using the configured markers.
    ///
    /// Text is returned unchanged when `keywords` holds no usable keyword.
    pub fn highlight_text(&self, text: &str, keywords: &[String]) -> Result<String, HighlightError> {
        match KeywordMatcher::new(keywords, self.settings.highlight_partial) {
            Ok(matcher) => Ok(matcher.highlight(text, &self.settings.prefix, &self.settings.suffix)),
            Err(HighlightError::NoKeywords) => Ok(text.to_string()),
            Err(err) => Err(err),
        }
    }

    /// Returns true if the field takes part in highlighting and excerpts.
    fn is_eligible(&self, field: &Field) -> bool {
        field.field_type().is_text() && !self.settings.exclude_fields.iter().any(|f| f == field.name())
    }

    /// Highlights the eligible fields of an item, keeping the ones that changed.
    fn highlight_item(&self, matcher: &KeywordMatcher, item: &Item) -> BTreeMap<String, Vec<String>> {
        let mut fields = BTreeMap::new();
        for field in item.fields().iter().filter(|f| self.is_eligible(f)) {
            let mut changed = false;
            let values: Vec<String> = field
                .values()
                .iter()
                .map(|value| {
                    let text = value.to_text();
                    let wrapped = matcher.highlight(&text, &self.settings.prefix, &self.settings.suffix);
                    changed |= wrapped != text;
                    wrapped
                })
                .collect();
            if changed {
                fields.insert(field.name().to_string(), values);
            }
        }
        fields
    }

    /// Builds the excerpt for an item from its eligible fields.
    fn excerpt_item(&self, matcher: &KeywordMatcher, item: &Item) -> Option<String> {
        let parts: Vec<String> = item
            .fields()
            .iter()
            .filter(|f| self.is_eligible(f))
            .flat_map(|f| f.values().iter().map(|v| v.to_text()))
            .collect();
        Excerpter::new(matcher, self.settings.excerpt_length).build(
            &parts,
            &self.settings.prefix,
            &self.settings.suffix,
        )
    }
}
