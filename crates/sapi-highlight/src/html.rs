//! Minimal HTML text handling.
//!
//! Field values may carry markup. Highlighting must never match inside a tag
//! or a character entity, and excerpts are built from the plain text.

/// Longest character entity recognised, including `&` and `;`.
const MAX_ENTITY_LEN: usize = 32;

/// A run of field text, either plain text or markup to be left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text.
    Text(&'a str),
    /// A tag or a character entity.
    Markup(&'a str),
}

/// Splits text into plain-text and markup segments.
///
/// A tag starts with `<` followed by a letter, `/`, `!` or `?` and runs to the
/// next `>`. Any other `<`, a `<` without a closing `>` and an `&` that does not
/// start a well-formed entity are plain text.
pub fn split_markup(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let markup_len = if opens_tag(rest) {
            rest.find('>').map(|end| end + 1)
        } else if rest.starts_with('&') {
            entity_len(rest)
        } else {
            None
        };

        match markup_len {
            Some(len) => {
                if text_start < pos {
                    segments.push(Segment::Text(&text[text_start..pos]));
                }
                segments.push(Segment::Markup(&rest[..len]));
                pos += len;
                text_start = pos;
            }
            None => {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if text_start < text.len() {
        segments.push(Segment::Text(&text[text_start..]));
    }
    segments
}

/// Returns true if `s` starts with something that opens a tag.
fn opens_tag(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Returns the byte length of the entity at the start of `s`, if there is one.
fn entity_len(s: &str) -> Option<usize> {
    let body_end = s.find(';')?;
    if body_end + 1 > MAX_ENTITY_LEN {
        return None;
    }
    let body = &s[1..body_end];
    let valid = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(dec) = body.strip_prefix('#') {
        !dec.is_empty() && dec.chars().all(|c| c.is_ascii_digit())
    } else {
        body.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && body.chars().all(|c| c.is_ascii_alphanumeric())
    };
    valid.then_some(body_end + 1)
}

/// Removes tags, leaving a space where each one was.
pub fn strip_tags(text: &str) -> String {
    split_markup(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Markup(m) if m.starts_with('<') => " ",
            Segment::Text(t) | Segment::Markup(t) => t,
        })
        .collect()
}

/// Decodes character entities; unknown named entities are kept as written.
pub fn decode_entities(text: &str) -> String {
    split_markup(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Markup(m) if m.starts_with('&') => decode_entity(m)
                .map(String::from)
                .unwrap_or_else(|| m.to_string()),
            Segment::Text(t) | Segment::Markup(t) => t.to_string(),
        })
        .collect()
}

/// Decodes one `&...;` entity.
fn decode_entity(entity: &str) -> Option<char> {
    let body = entity.strip_prefix('&')?.strip_suffix(';')?;
    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec.parse().ok().and_then(char::from_u32);
    }
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

/// Escapes text for inclusion in HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// Appends `text` to `out`, escaped for inclusion in HTML.
pub fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}

/// Collapses whitespace runs into single spaces and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces marked-up text to plain text: tags stripped, entities decoded, whitespace collapsed.
pub fn plain_text(text: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(text)))
}
