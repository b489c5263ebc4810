//! Validation rules shared by the DTOs and commands.
//!
//! The derive attributes in `models` and `auth` cover lengths and formats;
//! the rules here cover what `validator` has no built-in for.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use uuid::Uuid;
use validator::ValidationError;

lazy_static! {
    // Alphanumeric, underscores, hyphens
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Builds a `ValidationError` carrying a client-facing message.
pub fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Fails for empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required", "Este campo es obligatorio"));
    }
    Ok(())
}

/// Fails for the nil UUID, which is what an omitted identifier deserializes to
/// through `#[serde(default)]`.
pub fn not_nil(value: &Uuid) -> Result<(), ValidationError> {
    if value.is_nil() {
        return Err(rule("required", "El identificador es obligatorio"));
    }
    Ok(())
}

/// `deserialize_with` helper: strips surrounding whitespace before the length
/// rules see the value.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)?.trim().to_string())
}

/// `trimmed` for optional fields. Pair it with `#[serde(default)]`.
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(|s| s.trim().to_string()))
}

/// Trims and lowercases a search term; blank terms mean "no filter".
pub fn normalize_search(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}
