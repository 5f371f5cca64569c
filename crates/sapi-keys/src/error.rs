//! Query syntax errors.

use std::{error, fmt};

use thiserror::Error;

/// What is wrong with a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeysErrorKind {
    /// A `"` with no matching closing quote.
    #[error("unclosed quote")]
    UnclosedQuote,
    /// A `(` with no matching `)`.
    #[error("missing closing parenthesis")]
    UnclosedGroup,
    /// A `)` with no matching `(`.
    #[error("unexpected closing parenthesis")]
    UnexpectedClose,
    /// `OR` at the start or end of a group, or twice in a row.
    #[error("OR without keys on both sides")]
    DanglingOr,
    /// A `-` not followed by anything to negate.
    #[error("negation without keys")]
    DanglingNegation,
}

impl KeysErrorKind {
    /// Returns a suggestion for fixing the query.
    pub fn hint(self) -> &'static str {
        match self {
            Self::UnclosedQuote => "Add a closing quote (\") to complete the phrase",
            Self::UnclosedGroup => "Add a closing parenthesis ) to match the opening one",
            Self::UnexpectedClose => "Remove the ) or add a matching (",
            Self::DanglingOr => "OR requires keys on both sides, e.g., 'rust OR golang'",
            Self::DanglingNegation => "Put the - directly before a word, phrase or group, e.g., '-java'",
        }
    }
}

/// A query that could not be parsed.
///
/// Displays as the message, the query with a caret under the offending
/// character, and a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysError {
    /// What went wrong.
    pub kind: KeysErrorKind,
    /// Byte offset of the offending character.
    pub position: usize,
    /// The query as given.
    pub query: String,
}

impl KeysError {
    /// Creates an error for `query` at byte `position`.
    pub fn new(kind: KeysErrorKind, position: usize, query: &str) -> Self {
        Self {
            kind,
            position,
            query: query.to_string(),
        }
    }

    /// Returns the error message without context.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Character column of the offending character.
    fn column(&self) -> usize {
        self.query
            .get(..self.position)
            .map_or(0, |before| before.chars().count())
    }
}

impl fmt::Display for KeysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.kind)?;
        writeln!(f, "  {}", self.query)?;
        writeln!(f, "  {}^", " ".repeat(self.column()))?;
        write!(f, "hint: {}", self.kind.hint())
    }
}

impl error::Error for KeysError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_points_at_the_problem() {
        let err = KeysError::new(KeysErrorKind::UnclosedQuote, 5, "rust \"async");
        assert_eq!(
            err.to_string(),
            "query syntax error: unclosed quote\n  rust \"async\n       ^\nhint: Add a closing quote (\") to complete the phrase"
        );
    }

    #[test]
    fn caret_counts_characters() {
        let err = KeysError::new(KeysErrorKind::UnexpectedClose, "café ".len(), "café )");
        let caret_line = err.to_string().lines().nth(2).unwrap().to_string();
        assert_eq!(caret_line, "       ^");
    }

    #[test]
    fn every_kind_has_a_hint() {
        for kind in [
            KeysErrorKind::UnclosedQuote,
            KeysErrorKind::UnclosedGroup,
            KeysErrorKind::UnexpectedClose,
            KeysErrorKind::DanglingOr,
            KeysErrorKind::DanglingNegation,
        ] {
            assert!(!kind.hint().is_empty());
        }
        assert_eq!(
            KeysError::new(KeysErrorKind::DanglingOr, 0, "OR").message(),
            "OR without keys on both sides"
        );
    }
}
