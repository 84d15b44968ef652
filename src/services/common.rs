//! Request field rules shared by the facades.
//!
//! Every rule returns the normalized value (trimmed text) or the
//! `ValidationError` naming the field.

use crate::error::ValidationError;

const EMPTY: &str = "must not be empty";
const NOT_POSITIVE: &str = "must be greater than 0";
const NEGATIVE: &str = "must not be negative";

/// Text that must be present and non-empty after trimming.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::invalid(field, EMPTY));
    }
    Ok(trimmed.to_string())
}

/// Optional text that, when present, must be non-empty after trimming.
pub fn optional_text(field: &'static str, value: Option<String>) -> Result<Option<String>, ValidationError> {
    value.map(|v| required_text(field, &v)).transpose()
}

/// Optional text kept only when non-empty after trimming.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn positive(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::invalid(field, NOT_POSITIVE));
    }
    Ok(value)
}

pub fn non_negative(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::invalid(field, NEGATIVE));
    }
    Ok(value)
}

pub fn optional_positive(field: &'static str, value: Option<i64>) -> Result<Option<i64>, ValidationError> {
    value.map(|v| positive(field, v)).transpose()
}

pub fn optional_non_negative(field: &'static str, value: Option<i64>) -> Result<Option<i64>, ValidationError> {
    value.map(|v| non_negative(field, v)).transpose()
}

/// Price-like value; NaN is rejected along with negatives.
pub fn optional_amount(field: &'static str, value: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if v.is_nan() || v < 0.0 => Err(ValidationError::invalid(field, NEGATIVE)),
        other => Ok(other),
    }
}

/// List that must hold at least one item.
pub fn non_empty<T>(field: &'static str, items: Vec<T>) -> Result<Vec<T>, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::invalid(field, EMPTY));
    }
    Ok(items)
}

/// Optional list that, when present, must hold at least one item.
pub fn optional_non_empty<T>(field: &'static str, items: Option<Vec<T>>) -> Result<Option<Vec<T>>, ValidationError> {
    items.map(|list| non_empty(field, list)).transpose()
}
