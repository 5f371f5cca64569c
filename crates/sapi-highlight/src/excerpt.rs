//! Excerpt windowing.
//!
//! An excerpt shows the places in an item's text where the keywords occur.
//!
//! # Algorithm
//!
//! 1. Reduce each field value to plain text and join them with single spaces
//! 2. Pick matches round-robin over the keywords (every keyword's first
//!    occurrence, then every second occurrence, ...) up to one match per
//!    [`CHARS_PER_MATCH`] characters of excerpt length
//! 3. Give each match an equal share of the excerpt length: half before the
//!    match, the rest after it; a share that cannot be used at one end of the
//!    text moves to the other side
//! 4. Shrink windows inward to whole words, then merge overlapping or adjacent ones
//! 5. Escape each window, wrapping the keywords it contains, and join the windows
//!    with [`SEPARATOR`], marking truncated ends with an ellipsis
//!
//! All lengths are measured in characters.

use std::ops::Range;

use crate::{html::plain_text, matcher::KeywordMatcher};

/// Placed between non-adjacent windows.
pub const SEPARATOR: &str = " … ";

/// Marks text cut off before the first window.
pub const LEADING_ELLIPSIS: &str = "… ";

/// Marks text cut off after the last window.
pub const TRAILING_ELLIPSIS: &str = " …";

/// Excerpt length allotted per match when deciding how many matches to show.
pub const CHARS_PER_MATCH: usize = 40;

/// Builds excerpts around keyword matches.
#[derive(Debug, Clone, Copy)]
pub struct Excerpter<'a> {
    /// Finds the keywords.
    matcher: &'a KeywordMatcher,
    /// Maximum excerpt length, not counting ellipses and markers.
    length: usize,
}

impl<'a> Excerpter<'a> {
    /// Creates an excerpter producing excerpts of at most `length` characters of text.
    pub fn new(matcher: &'a KeywordMatcher, length: usize) -> Self {
        Self { matcher, length }
    }

    /// Builds an excerpt from field values, wrapping keywords in `prefix` and `suffix`.
    ///
    /// Returns `None` when no keyword occurs in the text.
    pub fn build<S: AsRef<str>>(&self, parts: &[S], prefix: &str, suffix: &str) -> Option<String> {
        if self.length == 0 {
            return None;
        }

        let text = parts
            .iter()
            .map(|part| plain_text(part.as_ref()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let chars: Vec<char> = text.chars().collect();
        let offsets = CharOffsets::new(&text);

        let max_matches = (self.length / CHARS_PER_MATCH).max(1);
        let matches: Vec<Range<usize>> = self
            .select_matches(&text, max_matches)
            .into_iter()
            .map(|range| offsets.to_chars(range))
            .collect();
        if matches.is_empty() {
            return None;
        }

        let budget = self.length / matches.len();
        let mut windows: Vec<Range<usize>> = matches
            .iter()
            .map(|m| snap_to_words(&chars, window(m, budget, chars.len()), m))
            .collect();
        windows.sort_by_key(|w| w.start);
        let windows = merge_windows(windows);

        let first_start = windows.first().map_or(0, |w| w.start);
        let last_end = windows.last().map_or(0, |w| w.end);

        let mut excerpt = String::new();
        if first_start > 0 {
            excerpt.push_str(LEADING_ELLIPSIS);
        }
        let pieces: Vec<String> = windows
            .iter()
            .map(|w| {
                let piece: String = chars[w.clone()].iter().collect();
                self.matcher.highlight_escaped(&piece, prefix, suffix)
            })
            .collect();
        excerpt.push_str(&pieces.join(SEPARATOR));
        if last_end < chars.len() {
            excerpt.push_str(TRAILING_ELLIPSIS);
        }

        Some(excerpt)
    }

    /// Picks up to `max` match byte ranges, round-robin over the keywords.
    fn select_matches(&self, text: &str, max: usize) -> Vec<Range<usize>> {
        let per_keyword: Vec<Vec<Range<usize>>> = (0..self.matcher.keywords().len())
            .map(|i| self.matcher.find_keyword(i, text))
            .collect();
        let rounds = per_keyword.iter().map(Vec::len).max().unwrap_or(0);

        let mut selected = Vec::new();
        for round in 0..rounds {
            for ranges in &per_keyword {
                if selected.len() == max {
                    return selected;
                }
                if let Some(range) = ranges.get(round) {
                    selected.push(range.clone());
                }
            }
        }
        selected
    }
}

/// Maps byte offsets to character offsets.
struct CharOffsets {
    /// Byte offset of every character, in order.
    starts: Vec<usize>,
}

impl CharOffsets {
    /// Indexes the characters of `text`.
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(i, _)| i).collect(),
        }
    }

    /// Converts a byte range on character boundaries to a character range.
    fn to_chars(&self, range: Range<usize>) -> Range<usize> {
        let start = self.starts.partition_point(|&b| b < range.start);
        let end = self.starts.partition_point(|&b| b < range.end);
        start..end
    }
}

/// Places the context window for one match within a text of `len` characters.
fn window(m: &Range<usize>, budget: usize, len: usize) -> Range<usize> {
    let before = budget / 2;
    let after = budget.saturating_sub(before + m.len());

    let mut start = m.start.saturating_sub(before);
    let unused_before = before - (m.start - start);
    let wanted_end = m.end + after + unused_before;
    let end = wanted_end.min(len);
    start = start.saturating_sub(wanted_end - end);

    start..end
}

/// Shrinks a window so it neither starts nor ends in the middle of a word.
///
/// The match itself is always kept.
fn snap_to_words(chars: &[char], mut w: Range<usize>, m: &Range<usize>) -> Range<usize> {
    while w.start < m.start && w.start > 0 && !chars[w.start - 1].is_whitespace() {
        w.start += 1;
    }
    while w.start < m.start && chars[w.start].is_whitespace() {
        w.start += 1;
    }
    while w.end > m.end && w.end < chars.len() && !chars[w.end].is_whitespace() {
        w.end -= 1;
    }
    while w.end > m.end && chars[w.end - 1].is_whitespace() {
        w.end -= 1;
    }
    w
}

/// Merges sorted windows that overlap or are separated by at most one character.
fn merge_windows(windows: Vec<Range<usize>>) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(windows.len());
    for w in windows {
        match merged.last_mut() {
            Some(current) if w.start <= current.end + 1 => {
                current.end = current.end.max(w.end);
            }
            _ => merged.push(w),
        }
    }
    merged
}
