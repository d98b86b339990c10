//! Field checks shared by the entity modules.

use crate::errors::ModelError;

/// Trimmed, non-empty, at most `max` characters.
pub fn required(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    if v.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(v.to_string())
}

/// Trimmed, possibly empty, at most `max` characters.
pub fn bounded(field: &str, value: &str, max: usize) -> Result<String, ModelError> {
    let v = value.trim();
    if v.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(v.to_string())
}

/// `None` for missing or blank input.
pub fn optional(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, ModelError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => bounded(field, v, max).map(Some),
    }
}

pub fn email(field: &str, value: &str) -> Result<String, ModelError> {
    let v = required(field, value, 255)?.to_ascii_lowercase();
    let mut parts = v.splitn(2, '@');
    let (local, domain) = (parts.next().unwrap_or(""), parts.next().unwrap_or(""));
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') || v.contains(char::is_whitespace) {
        return Err(ModelError::Validation(format!("{field} must be a valid email address")));
    }
    Ok(v)
}

pub fn url(field: &str, value: &str) -> Result<String, ModelError> {
    let v = required(field, value, 512)?;
    if !(v.starts_with("http://") || v.starts_with("https://")) {
        return Err(ModelError::Validation(format!("{field} must start with http(s)")));
    }
    Ok(v)
}

pub fn optional_url(field: &str, value: Option<&str>) -> Result<Option<String>, ModelError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => url(field, v).map(Some),
    }
}
