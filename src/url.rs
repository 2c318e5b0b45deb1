//! URL validation and normalization
//!
//! Free text is accepted as a link when it has a dotted host with an
//! alphabetic top-level label; the scheme is optional and filled in by
//! `normalize_url` after validation succeeds.

use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}(/.*)?$")
        .expect("static URL pattern compiles")
});

/// Check whether free-text input looks like a web address.
///
/// Accepts `[http://|https://]host.tld[/path]` where the top-level label
/// is 2+ ASCII letters. Whitespace around the input is ignored; empty or
/// dotless input is rejected. Never panics.
pub fn is_valid_url(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && URL_PATTERN.is_match(trimmed)
}

/// Prepend `https://` when no scheme is present.
///
/// Only called after `is_valid_url` accepted the input.
pub fn normalize_url(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
