//! Bullet-point text model.
//!
//! Splits shape text into bullet entries, strips typed bullet glyphs, and
//! provides the predicates the classifier uses to tell titles from lists.
//!
//! Leading glyphs are removed as a whole run: once a line starts with a
//! glyph, every following glyph and whitespace character is dropped too, so
//! `"•• item"` and `"• - item"` both become `"item"`. Parsing and cleaning
//! share this rule, which also makes cleaning idempotent.

use crate::types::BulletEntry;
use regex::Regex;
use std::sync::LazyLock;

/// Characters recognized as typed bullet markers.
pub const BULLET_GLYPHS: &[char] = &['•', '·', '*', '-'];

/// Text this long or longer is never treated as a title.
pub const TITLE_MAX_CHARS: usize = 100;

/// Optional indentation, a glyph, then any mix of glyphs and whitespace.
static LEADING_GLYPH_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•·*-][\s•·*-]*").unwrap());

/// A glyph followed by at least one whitespace character.
static BULLET_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•·*-]\s+").unwrap());

/// Remove the leading glyph run from a single line.
fn strip_leading_glyphs(line: &str) -> &str {
    match LEADING_GLYPH_RUN_REGEX.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Parse text into bullet entries.
///
/// Every line consumes an index, but blank lines and lines holding only
/// glyphs produce no entry, so indices can have gaps.
pub fn parse_bullet_points(text: &str) -> Vec<BulletEntry> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    text.split('\n')
        .enumerate()
        .filter_map(|(index, original)| {
            let line = original.trim();
            if line.is_empty() {
                return None;
            }

            let clean = strip_leading_glyphs(line);
            if clean.is_empty() {
                return None;
            }

            Some(BulletEntry::new(index, clean, original))
        })
        .collect()
}

/// Check whether text looks like bullet content.
///
/// Any glyph anywhere, three or more lines, or two glyph-led lines is
/// enough. Plain multi-paragraph text therefore counts as a list.
pub fn is_bullet_content(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    let has_glyphs = text.contains(BULLET_GLYPHS);
    let has_multiple_lines = text.matches('\n').count() > 1;
    let glyph_lines = text
        .split('\n')
        .filter(|line| BULLET_LINE_REGEX.is_match(line))
        .count();

    has_glyphs || has_multiple_lines || glyph_lines >= 2
}

/// Check whether text looks like a slide title: short, single line, and
/// not bullet content.
pub fn is_title_content(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    text.chars().count() < TITLE_MAX_CHARS && !text.contains('\n') && !is_bullet_content(text)
}

/// Remove typed bullet glyphs from every line before the text is handed to
/// a control that draws its own bullets.
///
/// Lines that end up empty are kept so the line count does not change.
pub fn clean_text_for_bullet_formatting(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.split('\n')
        .map(strip_leading_glyphs)
        .collect::<Vec<_>>()
        .join("\n")
}
