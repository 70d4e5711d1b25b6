//! Whitespace normalization.
//!
//! Whitespace follows Unicode's definition (`char::is_whitespace`): ASCII
//! space, tab, newline, carriage return, non-breaking space and the rest.

/// Collapses repeated whitespace, trims edges, and normalizes newlines to
/// single spaces.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  hello   world  "), "hello world");
/// assert_eq!(collapse_whitespace("hello\r\nworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
