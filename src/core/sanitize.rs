use crate::domain::model::ContactFields;

const TRIM_CHARS: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// Trims, removes backslash escapes and HTML-escapes a raw form value.
pub fn sanitize_input(raw: &str) -> String {
    let trimmed = raw.trim_matches(TRIM_CHARS);
    escape_html(&strip_slashes(trimmed))
}

/// `\x` becomes `x`, `\\` becomes `\`, `\0` becomes NUL, a trailing lone
/// backslash is dropped.
pub fn strip_slashes(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('0') => out.push('\0'),
                Some(next) => out.push(next),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Applied once at ingress; validation and rendering both see the result.
pub fn sanitize_fields(raw: &ContactFields) -> ContactFields {
    ContactFields {
        name: sanitize_input(&raw.name),
        email: sanitize_input(&raw.email),
        phone: sanitize_input(&raw.phone),
        message: sanitize_input(&raw.message),
    }
}
