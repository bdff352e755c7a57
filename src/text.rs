// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Helpful utilities for working with text.

use htmlentity::entity::{self, ICodedDataTrait};

/// Converts HTML entities into their single-character equivalents.
///
/// For example, Reddit returns "&" as "&amp;", ">" as "&gt;",
/// and "<" as "&lt;"; this function will convert those HTML
/// entities into single, human-readable characters.
///
/// Leading and trailing whitespace will also be trimmed from the string.
///
/// # Examples
///
/// ```
/// use reddit_cli::text::convert_html_entities;
/// let raw = "  &lt;This &amp; That&gt;  ";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "<This & That>");
/// ```
///
/// ```
/// use reddit_cli::text::convert_html_entities;
/// let raw = "A Plaintext Post";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, raw);
/// ```
pub fn convert_html_entities(text: &str) -> String {
    let text = text.trim();
    entity::decode(text.as_bytes())
        .to_string()
        .unwrap_or(text.to_string())
}

/// Shortens `text` to at most `max` characters, appending "..." when
/// anything was cut off.
///
/// Counts characters, not bytes, so multi-byte text is never split in the
/// middle of a character.
///
/// # Examples
///
/// ```
/// use reddit_cli::text::truncate;
/// assert_eq!(truncate("Hello, world", 5), "Hello...");
/// assert_eq!(truncate("Hello", 5), "Hello");
/// assert_eq!(truncate("Grüße", 3), "Grü...");
/// ```
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Formats a number with commas between groups of thousands.
///
/// # Examples
///
/// ```
/// use reddit_cli::text::with_separators;
/// assert_eq!(with_separators(1234567), "1,234,567");
/// assert_eq!(with_separators(-4200), "-4,200");
/// assert_eq!(with_separators(999), "999");
/// ```
pub fn with_separators(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 { format!("-{grouped}") } else { grouped }
}

/// Wraps `text` to `width` columns, preserving the paragraph breaks
/// already in the text.
pub fn wrap(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| textwrap::fill(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}
