//! Field constraints carried into validating targets.

use serde::Serialize;

/// A single field constraint with its human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validation {
    MinValue { value: i64, message: String },
    MaxValue { value: i64, message: String },
    MinLength { length: i64, message: String },
    MaxLength { length: i64, message: String },
    /// `pattern` is the bare expression, without delimiters
    Regex { pattern: String, message: String },
    Email { message: String },
}

impl Validation {
    pub fn min_value(value: i64, message: Option<&str>) -> Self {
        Self::MinValue {
            value,
            message: message_or(message, || format!("must be greater than or equal to {value}")),
        }
    }

    pub fn max_value(value: i64, message: Option<&str>) -> Self {
        Self::MaxValue {
            value,
            message: message_or(message, || format!("must be less than or equal to {value}")),
        }
    }

    pub fn min_length(length: i64, message: Option<&str>) -> Self {
        Self::MinLength {
            length,
            message: message_or(message, || format!("size must be at least {length}")),
        }
    }

    pub fn max_length(length: i64, message: Option<&str>) -> Self {
        Self::MaxLength {
            length,
            message: message_or(message, || format!("size must be at most {length}")),
        }
    }

    pub fn regex(pattern: impl Into<String>, message: Option<&str>) -> Self {
        let pattern = pattern.into();
        let message = message_or(message, || format!("must match \"{pattern}\""));
        Self::Regex { pattern, message }
    }

    /// Rejects empty and whitespace-only strings
    pub fn not_blank(message: Option<&str>) -> Self {
        Self::Regex {
            pattern: r"^(?!\s*$).+".to_string(),
            message: message_or(message, || "must not be blank".to_string()),
        }
    }

    pub fn email(message: Option<&str>) -> Self {
        Self::Email {
            message: message_or(message, || "must be a well-formed email address".to_string()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::MinValue { message, .. }
            | Self::MaxValue { message, .. }
            | Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::Regex { message, .. }
            | Self::Email { message } => message,
        }
    }
}

// Annotation messages in braces are bean-validation interpolation keys, not text.
fn message_or(message: Option<&str>, default: impl FnOnce() -> String) -> String {
    match message {
        Some(message) if !message.starts_with('{') => message.to_string(),
        _ => default(),
    }
}
