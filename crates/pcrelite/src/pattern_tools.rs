//! # Pattern Text Tools

/// Escape every non-alphanumeric character in `pattern` so it matches
/// itself literally.
///
/// NUL is written as `\000` to keep the result printable.
pub fn escape(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    for ch in pattern.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if ch == '\0' {
            out.push_str("\\000");
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}
