//! Line parser for `KEY value # comment` files
//!
//! [`parse`] returns a lazy iterator of [`RawEntry`] borrowed from the input.
//! Blank lines and lines starting with `#` are skipped. Each item is a
//! `Result`: a malformed line yields an `Err` and iteration carries on with
//! the next line, so callers choose between stopping at the first error and
//! collecting all of them.

use std::iter::Enumerate;
use std::str::Lines;

use crate::error::ConfigError;

/// One `KEY value # comment` line, before any typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    /// Parameter name, exactly as written
    pub key: &'a str,
    /// Value text with comment and surrounding whitespace removed
    pub raw_value: &'a str,
    /// Trailing comment text (after `#`), if non-empty
    pub comment: Option<&'a str>,
    /// 1-based line number
    pub line: usize,
}

/// Lazy iterator over the entries of a configuration text.
///
/// Cloning the iterator, or calling [`parse`] again on the same text,
/// restarts it from the beginning.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Enumerate<Lines<'a>>,
}

/// Parses configuration text into raw entries.
#[must_use]
pub fn parse(text: &str) -> Parser<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Parser {
        lines: text.lines().enumerate(),
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<RawEntry<'a>, ConfigError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, line) in self.lines.by_ref() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(parse_line(trimmed, idx + 1));
        }
        None
    }
}

fn parse_line(trimmed: &str, line: usize) -> Result<RawEntry<'_>, ConfigError> {
    let malformed = || ConfigError::MalformedLine {
        line,
        content: trimmed.to_string(),
    };

    let (key, rest) = trimmed.split_once(char::is_whitespace).ok_or_else(malformed)?;

    let (value, comment) = match comment_start(rest) {
        Some(pos) => (&rest[..pos], Some(rest[pos + 1..].trim())),
        None => (rest, None),
    };

    let raw_value = value.trim();
    if raw_value.is_empty() {
        return Err(malformed());
    }

    Ok(RawEntry {
        key,
        raw_value,
        comment: comment.filter(|c| !c.is_empty()),
        line,
    })
}

/// Byte offset of the comment `#`.
///
/// A value opening with `"` is only searched after its closing quote, so a
/// quoted value may contain `#`. Quotes elsewhere have no effect.
fn comment_start(s: &str) -> Option<usize> {
    let lead = s.len() - s.trim_start().len();
    let from = s[lead..]
        .strip_prefix('"')
        .and_then(|quoted| quoted.find('"'))
        .map_or(lead, |close| lead + close + 2);
    s[from..].find('#').map(|pos| from + pos)
}

/// Strips one pair of surrounding double quotes.
pub(crate) fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Returns `true` if `text`, written after a key, comes back as the raw value
/// unchanged: nothing is trimmed and nothing is taken as a comment.
pub(crate) fn reads_back_verbatim(text: &str) -> bool {
    !text.is_empty() && text.trim() == text && comment_start(text).is_none()
}
