//! Byte-budget truncation for field content

use std::borrow::Cow;

/// Maximum encoded size of a single string field
pub const MAX_FIELD_BYTES: usize = 32_768;

/// Cut `text` to at most `max_bytes` UTF-8 bytes without splitting a code point
///
/// Text within the budget is returned borrowed and unchanged.
///
/// # Examples
///
/// ```
/// use newrelic_log_formatter::core::truncate_to_bytes;
///
/// // "é" is two bytes, so a 3-byte budget keeps only "aé"
/// assert_eq!(truncate_to_bytes("aéb", 3), "aé");
/// assert_eq!(truncate_to_bytes("aéb", 2), "a");
/// ```
pub fn truncate_to_bytes(text: &str, max_bytes: usize) -> Cow<'_, str> {
    if text.len() <= max_bytes {
        return Cow::Borrowed(text);
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(text[..end].to_string())
}
