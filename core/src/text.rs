//! Shared text normalization helpers.

/// Collapses every whitespace run into a single space and trims both ends.
///
/// This is the normalization applied to question text on both sides of
/// answer matching, so prompts that differ only in line wrapping or
/// indentation still compare equal.
///
/// # Examples
///
/// ```
/// use formkey_core::text::collapse_ws;
///
/// assert_eq!(collapse_ws("  a \t b\n\nc "), "a b c");
/// assert_eq!(collapse_ws(""), "");
/// ```
pub fn collapse_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
