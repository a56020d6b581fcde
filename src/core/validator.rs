use crate::core::messages::Catalog;
use crate::domain::model::ContactFields;
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_MESSAGE_CHARS: usize = 10;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

// dot-atom local part, hostname labels, alphabetic TLD
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }
    match email.rsplit_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_PART_LEN => EMAIL_RE.is_match(email),
        _ => false,
    }
}

/// Checks sanitized fields and returns every violated rule, in field order.
pub fn validate_fields(fields: &ContactFields, catalog: &Catalog) -> Vec<String> {
    let mut errors = Vec::new();

    if fields.name.is_empty() {
        errors.push(catalog.name_missing.to_string());
    } else if fields.name.chars().count() < MIN_NAME_CHARS {
        errors.push(catalog.name_too_short.to_string());
    }

    if fields.email.is_empty() {
        errors.push(catalog.email_missing.to_string());
    } else if !is_valid_email(&fields.email) {
        errors.push(catalog.email_invalid.to_string());
    }

    if fields.message.is_empty() {
        errors.push(catalog.message_missing.to_string());
    } else if fields.message.chars().count() < MIN_MESSAGE_CHARS {
        errors.push(catalog.message_too_short.to_string());
    }

    errors
}
