//! Input validation helpers.
//!
//! Request DTOs derive [`validator::Validate`]; [`validate_input`] turns the
//! collected failures into a single [`CoreError::Validation`] message.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run the derived validation rules on `input`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Trim `value` and reject it when nothing is left.
pub fn require_non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Flatten field errors into `"msg; msg"`, sorted for stable output.
fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
