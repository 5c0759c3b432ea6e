// Utility functions

use crate::types::*;

/// Validates a value against a constraint and returns an error if it fails
pub fn validate<T, F>(
    value: T,
    constraint: F,
    error_message: impl Into<String>,
) -> AssistantResult<T>
where
    F: FnOnce(&T) -> bool,
{
    if constraint(&value) {
        Ok(value)
    } else {
        Err(AssistantError::InvalidParameter(error_message.into()))
    }
}

/// Fails with `MissingRequiredParameters` naming every empty entry
///
/// Entries are `(parameter name, value)` pairs; order is preserved in the
/// error so callers see the names in declaration order.
pub fn require_params(params: &[(&str, &str)]) -> AssistantResult<()> {
    let missing: Vec<&str> = params
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AssistantError::missing_parameters(missing))
    }
}

/// Validates a string against common constraints
pub struct StringValidator;

impl StringValidator {
    /// Validates that a string is not empty
    pub fn not_empty(value: impl Into<String>, param_name: &str) -> AssistantResult<String> {
        let value = value.into();
        validate(
            value,
            |s| !s.is_empty(),
            format!("{} cannot be empty", param_name),
        )
    }

    /// Rejects values wrapped in `{`, `}` or `"`, a common copy-paste mistake
    /// when credentials are lifted out of JSON or templates
    pub fn no_bad_chars(value: impl Into<String>, param_name: &str) -> AssistantResult<String> {
        let value = value.into();
        validate(
            value,
            |s| {
                let bad = |c: char| c == '{' || c == '}' || c == '"';
                !(s.starts_with(bad) || s.ends_with(bad))
            },
            format!(
                "The {} is invalid. Remove any surrounding {{, }}, or \" characters.",
                param_name
            ),
        )
    }
}
