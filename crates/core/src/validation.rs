//! Field-level validation helpers shared by the entity models.
//!
//! All functions are pure and return [`CoreError::Validation`] with a
//! message naming the offending field.

use chrono::NaiveDate;

use crate::error::CoreError;

/// Reject empty or whitespace-only strings.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Reject negative integers.
pub fn require_non_negative_i32(field: &str, value: i32) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be >= 0, got {value}"
        )));
    }
    Ok(())
}

/// Reject negative or non-finite numbers.
pub fn require_non_negative_f64(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be a finite number >= 0, got {value}"
        )));
    }
    Ok(())
}

/// Require that an optional value is present.
pub fn require_present<T>(field: &str, value: Option<&T>) -> Result<(), CoreError> {
    if value.is_none() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Validate the personnel list of a work log: at least one entry, no blank names.
pub fn validate_personnel(personnel: &[String]) -> Result<(), CoreError> {
    if personnel.is_empty() {
        return Err(CoreError::Validation(
            "personnel must list at least one person".to_string(),
        ));
    }
    if personnel.iter().any(|name| name.trim().is_empty()) {
        return Err(CoreError::Validation(
            "personnel names must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate that `start` is not after `end` when both are set.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CoreError::Validation(format!(
                "contract start date {start} is after end date {end}"
            )));
        }
    }
    Ok(())
}
