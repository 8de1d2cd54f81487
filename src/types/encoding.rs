//! Primitive value encoders shared by every request type.

/// Encode a boolean as the `yes`/`no` token Mailgun expects.
pub fn to_yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Returns true if the value is empty or contains only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns true if the value is absent, empty, or whitespace-only.
pub fn is_blank_opt(value: Option<&str>) -> bool {
    value.map_or(true, is_blank)
}
