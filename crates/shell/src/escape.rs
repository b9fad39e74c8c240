//! POSIX shell value escaping

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '_' | '-' | '.' | '/' | ':' | ',' | '+' | '=' | '@' | '%')
}

/// Escape a value so a POSIX shell reads it back byte for byte.
///
/// Safe values are returned bare. Everything else is single-quoted, with
/// embedded `'` written as `'"'"'`. The empty string becomes `''`.
#[must_use]
pub fn escape_bash_like(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }

    if s.chars().all(is_safe) {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len() + 10);
    result.push('\'');

    for c in s.chars() {
        if c == '\'' {
            result.push_str("'\"'\"'");
        } else {
            result.push(c);
        }
    }

    result.push('\'');
    result
}
