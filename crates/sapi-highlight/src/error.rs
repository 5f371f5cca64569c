//! Error types for the sapi-highlight crate.

use thiserror::Error;

/// Errors that can occur when preparing keyword matching.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// No non-empty keyword was given.
    #[error("no keywords to match")]
    NoKeywords,

    /// The keyword pattern could not be compiled.
    #[error("invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}
