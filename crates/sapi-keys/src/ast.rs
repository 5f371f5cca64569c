//! Search keys tree.
//!
//! Represents parsed search keys as consumed by result processors.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// How the children of a group combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Conjunction {
    /// All children must match.
    #[default]
    And,
    /// At least one child must match.
    Or,
}

impl Conjunction {
    /// Returns the keyword used for this conjunction in serialized keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Conjunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Conjunction {
    /// Reads a conjunction permissively: anything other than `OR` is treated as AND.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("OR") {
            Ok(Self::Or)
        } else {
            if !raw.eq_ignore_ascii_case("AND") {
                warn!(conjunction = %raw, "unrecognised conjunction in search keys, using AND");
            }
            Ok(Self::And)
        }
    }
}

/// A group of search keys combined with one conjunction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeysGroup {
    /// How the children combine. Missing conjunctions default to AND.
    #[serde(default, alias = "#conjunction")]
    pub conjunction: Conjunction,
    /// Whether the whole group is excluded from matching.
    #[serde(default, alias = "#negation", alias = "negation")]
    pub negated: bool,
    /// Child keywords and groups.
    #[serde(default)]
    pub children: Vec<KeysNode>,
}

/// A node in the search keys tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeysNode {
    /// A single keyword (a term or a whole phrase).
    Keyword(String),
    /// A group of keys.
    Group(KeysGroup),
}

impl KeysNode {
    /// Creates a keyword node.
    pub fn keyword(text: impl Into<String>) -> Self {
        Self::Keyword(text.into())
    }

    /// Creates an AND group, flattening nested non-negated AND groups.
    pub fn and(children: Vec<Self>) -> Self {
        Self::group(Conjunction::And, children)
    }

    /// Creates an OR group, flattening nested non-negated OR groups.
    pub fn or(children: Vec<Self>) -> Self {
        Self::group(Conjunction::Or, children)
    }

    /// Negates a node.
    ///
    /// A non-negated group is marked negated in place; anything else is wrapped in a
    /// negated AND group.
    pub fn not(node: Self) -> Self {
        match node {
            Self::Group(mut group) if !group.negated => {
                group.negated = true;
                Self::Group(group)
            }
            other => Self::Group(KeysGroup {
                conjunction: Conjunction::And,
                negated: true,
                children: vec![other],
            }),
        }
    }

    /// Builds a group, flattening children that share its conjunction.
    fn group(conjunction: Conjunction, children: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = children
            .into_iter()
            .flat_map(|child| match child {
                Self::Group(inner) if !inner.negated && inner.conjunction == conjunction => {
                    inner.children
                }
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1 {
            return flattened.remove(0);
        }

        Self::Group(KeysGroup {
            conjunction,
            negated: false,
            children: flattened,
        })
    }

    /// Returns true if this node is a negated group.
    pub fn is_negated(&self) -> bool {
        matches!(self, Self::Group(group) if group.negated)
    }

    /// Collects the keywords that should be highlighted.
    ///
    /// Everything below a negated group is skipped: what the user excluded is never
    /// highlighted. Keywords are trimmed of whitespace and quotes, empty keywords are
    /// dropped, and duplicates are removed keeping the first occurrence.
    pub fn positive_keywords(&self) -> Vec<String> {
        let mut keywords = Vec::new();
        let mut seen = HashSet::new();
        self.collect_positive(&mut keywords, &mut seen);
        keywords
    }

    /// Recursive helper for [`Self::positive_keywords`].
    fn collect_positive(&self, keywords: &mut Vec<String>, seen: &mut HashSet<String>) {
        match self {
            Self::Keyword(text) => {
                let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'');
                if !trimmed.is_empty() && seen.insert(trimmed.to_string()) {
                    keywords.push(trimmed.to_string());
                }
            }
            Self::Group(group) => {
                if group.negated {
                    return;
                }
                for child in &group.children {
                    child.collect_positive(keywords, seen);
                }
            }
        }
    }

    /// Returns true if there is no positive keyword anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.positive_keywords().is_empty()
    }

    /// Formats the keys as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Keyword(text) => writeln!(f, "{prefix}Keyword({text:?})"),
            Self::Group(group) => {
                let negation = if group.negated { "Not " } else { "" };
                let name = match group.conjunction {
                    Conjunction::And => "And",
                    Conjunction::Or => "Or",
                };
                writeln!(f, "{prefix}{negation}{name}")?;
                for child in &group.children {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Formats the keys back into query syntax.
    ///
    /// This produces output like: `rust OR "error handling" -deprecated`
    pub fn to_query_string(&self) -> String {
        self.fmt_query_string(false)
    }

    /// Internal helper for query string formatting.
    fn fmt_query_string(&self, nested: bool) -> String {
        match self {
            Self::Keyword(text) => {
                if text.chars().any(char::is_whitespace) {
                    format!("\"{text}\"")
                } else {
                    text.clone()
                }
            }
            Self::Group(group) => {
                let separator = match group.conjunction {
                    Conjunction::And => " ",
                    Conjunction::Or => " OR ",
                };
                let parts: Vec<String> = group
                    .children
                    .iter()
                    .map(|child| child.fmt_query_string(true))
                    .collect();
                let joined = parts.join(separator);

                if group.negated {
                    match group.children.as_slice() {
                        [Self::Keyword(_)] => format!("-{joined}"),
                        _ => format!("-({joined})"),
                    }
                } else if nested && parts.len() > 1 {
                    format!("({joined})")
                } else {
                    joined
                }
            }
        }
    }
}

impl fmt::Display for KeysNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
