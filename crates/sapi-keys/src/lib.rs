//! Search keys for sapi.
//!
//! Search keys are the parsed form of a user's query: a tree of keywords grouped under
//! AND/OR conjunctions, where any group may be negated. This crate provides:
//!
//! - **The keys tree**: [`KeysNode`] and [`KeysGroup`], with permissive deserialization
//!   from JSON (a missing or unknown conjunction is read as AND)
//! - **Flattening**: [`KeysNode::positive_keywords`] collects the keywords worth
//!   highlighting, skipping everything under a negated group
//! - **Query parsing**: [`parse`] turns query syntax into a keys tree
//!
//! Query syntax:
//!
//! - **Words**: `rust` - keys that must appear; `well-known` and `12"` are single words
//! - **Phrases**: `"error handling"` - exact sequences (one keyword)
//! - **Negation**: `-deprecated`, `-"old api"`, `-(a b)` - keys that must NOT appear
//! - **OR**: `rust OR golang` - alternatives, binding looser than the implicit AND
//! - **Grouping**: `(a b) OR (c d)` - precedence control
//!
//! # Example
//!
//! ```
//! use sapi_keys::parse;
//!
//! let keys = parse("(rust OR golang) -deprecated").unwrap().unwrap();
//! assert_eq!(keys.positive_keywords(), vec!["rust", "golang"]);
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod query;

pub use ast::{Conjunction, KeysGroup, KeysNode};
pub use error::{KeysError, KeysErrorKind};
pub use query::parse;
