//! Field values and their conversions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CoercionError, FieldType};

/// Score given to tokens that do not carry one.
pub const DEFAULT_TOKEN_SCORE: f64 = 1.0;

/// A single word of tokenized text with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The token text.
    pub text: String,
    /// Relevance of the token within its field.
    #[serde(default = "default_score")]
    pub score: f64,
}

/// Serde default for [`Token::score`].
fn default_score() -> f64 {
    DEFAULT_TOKEN_SCORE
}

impl Token {
    /// Creates a token with the default score.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: DEFAULT_TOKEN_SCORE,
        }
    }
}

/// Splits text on whitespace into tokens with the default score.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace().map(Token::new).collect()
}

/// A number produced by casting a field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    /// An integral number.
    Integer(i64),
    /// A floating point number.
    Decimal(f64),
}

impl Numeric {
    /// Returns the number as a float.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Decimal(d) => d,
        }
    }

    /// Returns the field type that holds this number without loss.
    pub fn field_type(self) -> FieldType {
        match self {
            Self::Integer(_) => FieldType::Integer,
            Self::Decimal(_) => FieldType::Decimal,
        }
    }

    /// Converts the number into a field value of matching type.
    pub fn into_value(self) -> FieldValue {
        match self {
            Self::Integer(i) => FieldValue::Integer(i),
            Self::Decimal(d) => FieldValue::Decimal(d),
        }
    }
}

/// A single value of an item field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Unprocessed string.
    String(String),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Decimal(f64),
    /// Boolean flag.
    Boolean(bool),
    /// Fulltext.
    Text(String),
    /// Tokenized fulltext.
    Tokens(Vec<Token>),
}

impl FieldValue {
    /// Returns the field type this value conforms to.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::String(_) => FieldType::String,
            Self::Integer(_) => FieldType::Integer,
            Self::Decimal(_) => FieldType::Decimal,
            Self::Boolean(_) => FieldType::Boolean,
            Self::Text(_) => FieldType::Text,
            Self::Tokens(_) => FieldType::TokenizedText,
        }
    }

    /// Renders the value as plain text.
    ///
    /// Tokens are joined with single spaces and booleans render as `1` or `0`.
    pub fn to_text(&self) -> String {
        match self {
            Self::String(s) | Self::Text(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Boolean(b) => String::from(if *b { "1" } else { "0" }),
            Self::Tokens(tokens) => join_tokens(tokens),
        }
    }

    /// Casts the value to a number, or `None` when it has no numeric reading.
    pub fn as_number(&self) -> Option<Numeric> {
        match self {
            Self::Integer(i) => Some(Numeric::Integer(*i)),
            Self::Decimal(d) if d.is_finite() => Some(Numeric::Decimal(*d)),
            Self::Decimal(_) => None,
            Self::Boolean(b) => Some(Numeric::Integer(i64::from(*b))),
            Self::String(s) | Self::Text(s) => parse_number(s),
            Self::Tokens(tokens) => parse_number(&join_tokens(tokens)),
        }
    }

    /// Converts the value into the given type.
    pub fn coerce(&self, target: FieldType) -> Result<Self, CoercionError> {
        if self.field_type() == target {
            return Ok(self.clone());
        }

        let fail = || CoercionError::new(self.to_text(), target);
        match target {
            FieldType::String => Ok(Self::String(self.to_text())),
            FieldType::Text => Ok(Self::Text(self.to_text())),
            FieldType::TokenizedText => Ok(Self::Tokens(tokenize(&self.to_text()))),
            FieldType::Integer => match self.as_number().ok_or_else(fail)? {
                Numeric::Integer(i) => Ok(Self::Integer(i)),
                Numeric::Decimal(d) => truncate(d).map(Self::Integer).ok_or_else(fail),
            },
            FieldType::Decimal => self
                .as_number()
                .map(|n| Self::Decimal(n.as_f64()))
                .ok_or_else(fail),
            FieldType::Boolean => self.as_bool().map(Self::Boolean).ok_or_else(fail),
        }
    }

    /// Reads the value as a boolean flag.
    fn as_bool(&self) -> Option<bool> {
        if let Self::Boolean(b) = self {
            return Some(*b);
        }
        let text = self.to_text();
        match text.trim().to_lowercase().as_str() {
            "" | "false" | "off" | "no" => Some(false),
            "true" | "on" | "yes" => Some(true),
            _ => self.as_number().map(|n| n.as_f64() != 0.0),
        }
    }

    /// Builds a value of the given type from a JSON value.
    ///
    /// Tokenized text accepts an array of strings or `{text, score}` objects, or a
    /// string which is split on whitespace.
    pub fn from_json(json: &Value, target: FieldType) -> Result<Self, CoercionError> {
        if target == FieldType::TokenizedText
            && let Value::Array(items) = json
        {
            return items
                .iter()
                .map(token_from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::Tokens)
                .ok_or_else(|| CoercionError::new(json.to_string(), target));
        }

        let natural = match json {
            Value::String(s) => Self::String(s.clone()),
            Value::Bool(b) => Self::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Decimal(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::Null | Value::Array(_) | Value::Object(_) => {
                return Err(CoercionError::new(json.to_string(), target));
            }
        };
        natural.coerce(target)
    }

    /// Guesses the field type of an untyped JSON value.
    pub fn infer_type(json: &Value) -> Option<FieldType> {
        match json {
            Value::String(_) => Some(FieldType::String),
            Value::Bool(_) => Some(FieldType::Boolean),
            Value::Number(n) if n.is_i64() => Some(FieldType::Integer),
            Value::Number(_) => Some(FieldType::Decimal),
            Value::Array(_) => Some(FieldType::TokenizedText),
            Value::Null | Value::Object(_) => None,
        }
    }
}

/// Joins token texts with single spaces.
fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses trimmed text as an integer, then as a finite float.
fn parse_number(text: &str) -> Option<Numeric> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(Numeric::Integer(i));
    }
    text.parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
        .map(Numeric::Decimal)
}

/// Truncates a float toward zero when the result fits an `i64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn truncate(d: f64) -> Option<i64> {
    let t = d.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

/// Reads one token from a JSON string or `{text, score}` object.
fn token_from_json(json: &Value) -> Option<Token> {
    match json {
        Value::String(s) => Some(Token::new(s.clone())),
        Value::Object(_) => serde_json::from_value(json.clone()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tokenize_splits_on_whitespace() {
        let tokens = tokenize("  foo bar\tbaz ");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["foo", "bar", "baz"]);
        assert!(tokens.iter().all(|t| t.score == DEFAULT_TOKEN_SCORE));
    }

    #[test]
    fn to_text_renderings() {
        assert_eq!(FieldValue::Boolean(true).to_text(), "1");
        assert_eq!(FieldValue::Boolean(false).to_text(), "0");
        assert_eq!(FieldValue::Decimal(2.5).to_text(), "2.5");
        assert_eq!(FieldValue::Decimal(3.0).to_text(), "3");
        assert_eq!(FieldValue::Tokens(tokenize("foo bar")).to_text(), "foo bar");
    }

    #[test]
    fn as_number_casts() {
        assert_eq!(FieldValue::Integer(4).as_number(), Some(Numeric::Integer(4)));
        assert_eq!(FieldValue::Boolean(true).as_number(), Some(Numeric::Integer(1)));
        assert_eq!(
            FieldValue::String(" 16 ".into()).as_number(),
            Some(Numeric::Integer(16))
        );
        assert_eq!(
            FieldValue::Text("2.5".into()).as_number(),
            Some(Numeric::Decimal(2.5))
        );
        assert_eq!(FieldValue::String("abc".into()).as_number(), None);
        assert_eq!(FieldValue::String("inf".into()).as_number(), None);
    }

    #[test]
    fn coerce_to_integer() {
        assert_eq!(
            FieldValue::String("7".into()).coerce(FieldType::Integer),
            Ok(FieldValue::Integer(7))
        );
        assert_eq!(
            FieldValue::Decimal(7.9).coerce(FieldType::Integer),
            Ok(FieldValue::Integer(7))
        );
        let err = FieldValue::String("abc".into())
            .coerce(FieldType::Integer)
            .unwrap_err();
        assert_eq!(err.value, "abc");
        assert_eq!(err.target, FieldType::Integer);
    }

    #[test]
    fn coerce_to_text_types_always_succeeds() {
        assert_eq!(
            FieldValue::Integer(3).coerce(FieldType::Text),
            Ok(FieldValue::Text("3".into()))
        );
        assert_eq!(
            FieldValue::Text("foo bar".into()).coerce(FieldType::TokenizedText),
            Ok(FieldValue::Tokens(tokenize("foo bar")))
        );
    }

    #[test]
    fn coerce_to_boolean() {
        assert_eq!(
            FieldValue::String("yes".into()).coerce(FieldType::Boolean),
            Ok(FieldValue::Boolean(true))
        );
        assert_eq!(
            FieldValue::Integer(0).coerce(FieldType::Boolean),
            Ok(FieldValue::Boolean(false))
        );
        assert!(FieldValue::String("maybe".into())
            .coerce(FieldType::Boolean)
            .is_err());
    }

    #[test]
    fn from_json_tokens() {
        let value = FieldValue::from_json(
            &json!(["foo", {"text": "bar", "score": 2.0}]),
            FieldType::TokenizedText,
        )
        .unwrap();
        assert_eq!(
            value,
            FieldValue::Tokens(vec![
                Token::new("foo"),
                Token {
                    text: "bar".into(),
                    score: 2.0
                }
            ])
        );
    }

    #[test]
    fn from_json_scalars() {
        assert_eq!(
            FieldValue::from_json(&json!(2), FieldType::Decimal),
            Ok(FieldValue::Decimal(2.0))
        );
        assert_eq!(
            FieldValue::from_json(&json!("hello"), FieldType::Text),
            Ok(FieldValue::Text("hello".into()))
        );
        assert!(FieldValue::from_json(&json!(null), FieldType::String).is_err());
    }

    #[test]
    fn infer_type_from_json() {
        assert_eq!(FieldValue::infer_type(&json!("x")), Some(FieldType::String));
        assert_eq!(FieldValue::infer_type(&json!(1)), Some(FieldType::Integer));
        assert_eq!(FieldValue::infer_type(&json!(1.5)), Some(FieldType::Decimal));
        assert_eq!(FieldValue::infer_type(&json!(null)), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_value(vec![
            FieldValue::Integer(1),
            FieldValue::Text("a".into()),
            FieldValue::Tokens(vec![Token::new("b")]),
        ])
        .unwrap();
        assert_eq!(json, json!([1, "a", [{"text": "b", "score": 1.0}]]));
    }
}
