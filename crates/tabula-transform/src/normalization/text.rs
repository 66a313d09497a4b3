//! Free-text cleanup for names, categories, and review fields.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of any whitespace, including tabs and line breaks.
static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Characters outside the allowed text alphabet.
static DISALLOWED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9 \-.,!?()]").expect("Invalid character regex"));

/// Default maximum length of a cleaned text field, in characters.
pub const DEFAULT_MAX_TEXT_LEN: usize = 1000;

/// Cleans a free-text value.
///
/// Whitespace runs collapse to one space, characters outside
/// `[A-Za-z0-9 -.,!?()]` are removed, the result is trimmed and then cut to
/// `max_len` characters. Returns `None` when nothing is left.
pub fn clean_text(value: &str, max_len: usize) -> Option<String> {
    let collapsed = WHITESPACE_REGEX.replace_all(value.trim(), " ");
    let stripped = DISALLOWED_REGEX.replace_all(&collapsed, "");
    // Removed characters can leave double spaces behind
    let tidied = WHITESPACE_REGEX.replace_all(stripped.trim(), " ");

    let truncated: String = tidied.chars().take(max_len).collect();
    let truncated = truncated.trim_end();
    if truncated.is_empty() {
        None
    } else {
        Some(truncated.to_string())
    }
}

/// Trims an identifier or URL without altering its content.
pub fn clean_verbatim(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
