//! Validation error types

use std::fmt;

/// Validation error for request bodies and domain models
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is missing or blank when it is required
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Value outside the accepted set (sort keys, booleans, ...)
    InvalidVariant { field: &'static str, value: String },

    /// Request body could not be decoded
    MalformedBody { reason: String },

    /// Multiple required fields missing at once
    Required { message: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::MalformedBody { reason } => write!(f, "invalid request body: {}", reason),
            Self::Required { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub fn required_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 255 characters"
        );
        assert_eq!(
            ValidationError::Empty { field: "name" }.to_string(),
            "name is required"
        );
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text("year", Some("  2024 "), 16).unwrap(), "2024");
        assert!(matches!(
            required_text("year", Some("   "), 16),
            Err(ValidationError::Empty { field: "year" })
        ));
        assert!(matches!(
            required_text("year", None, 16),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            required_text("year", Some("12345"), 4),
            Err(ValidationError::TooLong { max: 4, .. })
        ));
    }
}
