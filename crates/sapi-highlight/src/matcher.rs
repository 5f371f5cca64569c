//! Keyword matching.
//!
//! Keywords and text are compared after folding: every character is
//! canonically decomposed and combining marks are dropped, so `cafe` matches
//! `Café`. Case is ignored by the patterns. Matches are reported as byte
//! ranges of the unfolded text.

use std::{iter, ops::Range};

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    HighlightError,
    html::{Segment, push_escaped, split_markup},
};

/// Matches a set of keywords in text, case- and accent-insensitively and on word boundaries.
///
/// Built once per result set; immutable afterwards, so it can be shared across threads.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    /// The keywords, in the order given.
    keywords: Vec<String>,
    /// Alternation of all keywords, longest first.
    combined: Regex,
    /// One pattern per keyword, parallel to `keywords`.
    patterns: Vec<Regex>,
}

impl KeywordMatcher {
    /// Builds a matcher for the given keywords.
    ///
    /// With `partial` set, keywords also match inside longer words.
    pub fn new(keywords: &[String], partial: bool) -> Result<Self, HighlightError> {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        if keywords.is_empty() {
            return Err(HighlightError::NoKeywords);
        }

        let folded: Vec<String> = keywords.iter().map(|k| Folded::new(k).text).collect();

        let mut longest_first: Vec<&String> = folded.iter().collect();
        longest_first.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        let alternation = longest_first
            .iter()
            .map(|k| format!("(?:{})", keyword_pattern(k, partial)))
            .collect::<Vec<_>>()
            .join("|");
        let combined = Regex::new(&format!("(?i){alternation}"))?;

        let patterns = folded
            .iter()
            .map(|k| Regex::new(&format!("(?i){}", keyword_pattern(k, partial))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            keywords,
            combined,
            patterns,
        })
    }

    /// Returns the keywords this matcher looks for.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns true if any keyword occurs in the text.
    pub fn is_match(&self, text: &str) -> bool {
        self.combined.is_match(&Folded::new(text).text)
    }

    /// Returns the byte ranges of every occurrence of the keyword at `index`.
    pub fn find_keyword(&self, index: usize, text: &str) -> Vec<Range<usize>> {
        self.patterns
            .get(index)
            .map(|pattern| find(pattern, text))
            .unwrap_or_default()
    }

    /// Wraps every keyword occurrence in `prefix` and `suffix`.
    ///
    /// Tags and character entities are copied through untouched. Text without
    /// any occurrence is returned unchanged.
    pub fn highlight(&self, text: &str, prefix: &str, suffix: &str) -> String {
        if !self.is_match(text) {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + prefix.len() + suffix.len());
        for segment in split_markup(text) {
            match segment {
                Segment::Text(t) => self.wrap(&mut out, t, prefix, suffix, String::push_str),
                Segment::Markup(m) => out.push_str(m),
            }
        }
        out
    }

    /// Wraps every keyword occurrence in plain text, escaping the text for HTML.
    ///
    /// Matching sees the unescaped text, so keywords such as `AT&T` are found.
    pub fn highlight_escaped(&self, text: &str, prefix: &str, suffix: &str) -> String {
        let mut out = String::with_capacity(text.len() + prefix.len() + suffix.len());
        self.wrap(&mut out, text, prefix, suffix, push_escaped);
        out
    }

    /// Appends `text` to `out` with every match wrapped; `push` writes the text itself.
    fn wrap(
        &self,
        out: &mut String,
        text: &str,
        prefix: &str,
        suffix: &str,
        push: fn(&mut String, &str),
    ) {
        let mut last = 0;
        for range in find(&self.combined, text) {
            push(out, &text[last..range.start]);
            out.push_str(prefix);
            push(out, &text[range.clone()]);
            out.push_str(suffix);
            last = range.end;
        }
        push(out, &text[last..]);
    }
}

/// Text prepared for matching, with a way back to the original offsets.
struct Folded {
    /// Decomposed text without combining marks.
    text: String,
    /// For every byte of `text`, where its source character starts.
    starts: Vec<usize>,
    /// For every byte of `text`, where its source character ends, dropped marks included.
    ends: Vec<usize>,
}

impl Folded {
    /// Folds `original`.
    fn new(original: &str) -> Self {
        let mut folded = Self {
            text: String::with_capacity(original.len()),
            starts: Vec::with_capacity(original.len()),
            ends: Vec::with_capacity(original.len()),
        };
        let mut last_kept = None;

        for (start, c) in original.char_indices() {
            let end = start + c.len_utf8();
            let mut kept = false;
            for d in iter::once(c).nfd() {
                if is_combining_mark(d) {
                    continue;
                }
                last_kept = Some(folded.text.len());
                folded.text.push(d);
                folded.starts.resize(folded.text.len(), start);
                folded.ends.resize(folded.text.len(), end);
                kept = true;
            }
            if !kept && let Some(at) = last_kept {
                folded.ends[at..].fill(end);
            }
        }
        folded
    }

    /// Maps a range of the folded text back to the original text.
    fn original(&self, range: Range<usize>) -> Option<Range<usize>> {
        let start = *self.starts.get(range.start)?;
        let end = *self.ends.get(range.end.checked_sub(1)?)?;
        Some(start..end)
    }
}

/// Finds the non-overlapping matches of `pattern` in `text`, as byte ranges of `text`.
fn find(pattern: &Regex, text: &str) -> Vec<Range<usize>> {
    let folded = Folded::new(text);
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for m in pattern.find_iter(&folded.text) {
        let Some(range) = folded.original(m.range()) else {
            continue;
        };
        if ranges.last().is_some_and(|prev| range.start < prev.end) {
            continue;
        }
        ranges.push(range);
    }
    ranges
}

/// Builds the pattern for one folded keyword.
///
/// Whitespace inside the keyword matches any whitespace run. Word boundaries are
/// only required on sides where the keyword begins or ends with a word character.
fn keyword_pattern(keyword: &str, partial: bool) -> String {
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let starts_word = keyword.chars().next().is_some_and(is_word_char);
    let ends_word = keyword.chars().next_back().is_some_and(is_word_char);
    let before = if starts_word && !partial { r"\b" } else { "" };
    let after = if ends_word && !partial { r"\b" } else { "" };
    format!("{before}{body}{after}")
}

/// Returns true for characters that `\b` treats as part of a word.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
