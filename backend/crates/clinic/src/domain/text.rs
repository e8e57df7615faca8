//! Free-text input rules shared by the clinical records

use crate::error::{ClinicError, ClinicResult};

/// Trimmed, non-empty, at most `max` characters
pub fn required(raw: &str, field: &'static str, max: usize) -> ClinicResult<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ClinicError::invalid(field, "This field is required"));
    }
    check_len(value, field, max)?;
    Ok(value.to_string())
}

/// Blank input becomes `None`
pub fn optional(raw: Option<&str>, field: &'static str, max: usize) -> ClinicResult<Option<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            check_len(value, field, max)?;
            Ok(Some(value.to_string()))
        }
    }
}

/// Optional count that may not be negative
pub fn non_negative(value: Option<i32>, field: &'static str) -> ClinicResult<Option<i32>> {
    match value {
        Some(v) if v < 0 => Err(ClinicError::invalid(field, "Must be zero or greater")),
        other => Ok(other),
    }
}

fn check_len(value: &str, field: &'static str, max: usize) -> ClinicResult<()> {
    if value.chars().count() > max {
        return Err(ClinicError::invalid(
            field,
            format!("Must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Unbounded free text (diagnoses, notes)
pub const LONG_TEXT: usize = 10_000;
