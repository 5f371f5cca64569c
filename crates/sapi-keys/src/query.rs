//! Query-string parsing.
//!
//! Reads what a user typed into a search box straight into a keys tree, one
//! character at a time.
//!
//! - Words are separated by whitespace and parentheses. A `-` or `"` inside a
//!   word is part of it (`well-known`, `12"`).
//! - A quoted phrase is one keyword with its inner whitespace collapsed. An
//!   empty phrase adds nothing.
//! - A `-` at the start of a word, phrase or group negates it.
//! - Adjacent keys are ANDed; a standalone `OR` (any case) separates
//!   alternatives and binds looser than AND.
//! - Parentheses group; an empty group adds nothing.

use std::mem;

use crate::{
    ast::KeysNode,
    error::{KeysError, KeysErrorKind},
};

/// Parses a query string into a search keys tree.
///
/// Returns `Ok(None)` when the query holds no keys at all.
pub fn parse(query: &str) -> Result<Option<KeysNode>, KeysError> {
    let mut parser = Parser { query, pos: 0 };
    let keys = parser.alternatives()?;
    if parser.peek() == Some(')') {
        return Err(parser.error(KeysErrorKind::UnexpectedClose, parser.pos));
    }
    Ok(keys)
}

/// Cursor over the query.
struct Parser<'a> {
    /// The whole query.
    query: &'a str,
    /// Byte offset of the next character.
    pos: usize,
}

impl Parser<'_> {
    /// Reads keys up to the end of the query or an unmatched `)`.
    fn alternatives(&mut self) -> Result<Option<KeysNode>, KeysError> {
        let mut alternatives = Vec::new();
        let mut current = Vec::new();
        let mut last_or = None;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(')') => break,
                _ if self.at_or() => {
                    if current.is_empty() {
                        return Err(self.error(KeysErrorKind::DanglingOr, self.pos));
                    }
                    alternatives.push(KeysNode::and(mem::take(&mut current)));
                    last_or = Some(self.pos);
                    self.pos += 2;
                }
                _ => current.extend(self.item()?),
            }
        }

        if !current.is_empty() {
            alternatives.push(KeysNode::and(current));
        } else if let Some(at) = last_or {
            return Err(self.error(KeysErrorKind::DanglingOr, at));
        }

        Ok(match alternatives.len() {
            0 => None,
            1 => alternatives.pop(),
            _ => Some(KeysNode::or(alternatives)),
        })
    }

    /// Reads one word, phrase or group, with any leading negation.
    ///
    /// `None` for empty phrases and groups.
    fn item(&mut self) -> Result<Option<KeysNode>, KeysError> {
        let start = self.pos;
        match self.peek() {
            Some('-') => {
                self.bump();
                if self.peek().is_none_or(|c| c.is_whitespace() || c == ')') {
                    return Err(self.error(KeysErrorKind::DanglingNegation, start));
                }
                Ok(self.item()?.map(KeysNode::not))
            }
            Some('"') => self.phrase(),
            Some('(') => self.group(),
            _ => {
                while !self.at_word_end() {
                    self.bump();
                }
                Ok(Some(KeysNode::keyword(&self.query[start..self.pos])))
            }
        }
    }

    /// Reads a quoted phrase; the cursor is on the opening quote.
    fn phrase(&mut self) -> Result<Option<KeysNode>, KeysError> {
        let open = self.pos;
        let start = open + 1;
        let Some(len) = self.query[start..].find('"') else {
            return Err(self.error(KeysErrorKind::UnclosedQuote, open));
        };
        self.pos = start + len + 1;

        let words: Vec<&str> = self.query[start..start + len].split_whitespace().collect();
        Ok((!words.is_empty()).then(|| KeysNode::keyword(words.join(" "))))
    }

    /// Reads a parenthesized group; the cursor is on the `(`.
    fn group(&mut self) -> Result<Option<KeysNode>, KeysError> {
        let open = self.pos;
        self.bump();
        let inner = self.alternatives()?;
        if self.bump() != Some(')') {
            return Err(self.error(KeysErrorKind::UnclosedGroup, open));
        }
        Ok(inner)
    }

    /// Returns true if the cursor is on a standalone `OR`.
    fn at_or(&self) -> bool {
        let rest = &self.query[self.pos..];
        rest.get(..2).is_some_and(|w| w.eq_ignore_ascii_case("or"))
            && rest[2..].chars().next().is_none_or(ends_word)
    }

    /// Returns true if the cursor is past the last character of a word.
    fn at_word_end(&self) -> bool {
        self.peek().is_none_or(ends_word)
    }

    /// Skips whitespace.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.query[self.pos..].chars().next()
    }

    /// Consumes and returns the next character.
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Builds an error at byte `position`.
    fn error(&self, kind: KeysErrorKind, position: usize) -> KeysError {
        KeysError::new(kind, position, self.query)
    }
}

/// Returns true for characters that end a word.
fn ends_word(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}
