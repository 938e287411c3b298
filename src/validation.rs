//! Field validators. Each returns the cleaned value or a message destined for
//! a [`crate::error::FieldErrors`] report keyed by the caller.

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err("cannot be blank".to_string())
    } else {
        Ok(trimmed)
    }
}

/// Validates a rough e-mail shape: non-blank, with a local part and a domain
/// around a single `@`.
pub fn email_shape(value: &str) -> Result<String, String> {
    let trimmed = non_blank(value)?;
    match trimmed.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(trimmed)
        }
        _ => Err("is not a valid e-mail address".to_string()),
    }
}

/// Validates a US zip code: five digits with an optional `-NNNN` extension.
/// Blank input is valid and yields `None`.
pub fn zip_shape(value: &str) -> Result<Option<String>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let (base, ext) = match trimmed.split_once('-') {
        Some((base, ext)) => (base, Some(ext)),
        None => (trimmed, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if base.len() == 5 && all_digits(base) && ext.map_or(true, |e| e.len() == 4 && all_digits(e)) {
        Ok(Some(trimmed.to_string()))
    } else {
        Err("is not a valid zip code".to_string())
    }
}

/// Validates a phone number: must contain a digit and fit in 32 characters.
pub fn phone_shape(value: &str) -> Result<(), String> {
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err("must contain at least one digit".to_string());
    }
    if value.len() > 32 {
        return Err("is too long".to_string());
    }
    Ok(())
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
