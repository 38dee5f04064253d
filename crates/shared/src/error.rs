use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNKNOWN_ERROR_FALLBACK: &str = "Unknown error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Request,
    Decode,
    Unknown,
}

/// Terminal failure of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("API Error {status}: {body}")]
    Request { status: u16, body: String },
    #[error("response did not match the report schema: {detail}")]
    Decode { detail: String },
    #[error("{message}")]
    Unknown { message: String },
}

impl SubmissionError {
    pub fn request(status: u16, body: impl Into<String>) -> Self {
        Self::Request {
            status,
            body: body.into(),
        }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        Self::Decode {
            detail: detail.into(),
        }
    }

    /// Keeps the original message when there is one.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self::Unknown {
                message: UNKNOWN_ERROR_FALLBACK.to_string(),
            };
        }
        Self::Unknown { message }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Request { .. } => ErrorKind::Request,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{domain} value {value} is outside {min}..={max}")]
pub struct OutOfRange {
    pub domain: &'static str,
    pub value: i64,
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown survey field '{0}'")]
    UnknownField(String),
    #[error("'{value}' is not a valid {domain}; expected one of: {}", .allowed.join(" | "))]
    UnknownOption {
        domain: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },
    #[error("'{value}' is not a whole number for {domain}")]
    InvalidNumber { domain: &'static str, value: String },
}

/// A decoded report whose values fall outside the declared schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("{field} must be a finite fraction in [0, 1], got {value}")]
    Fraction { field: &'static str, value: f64 },
    #[error("{field} must be a finite non-negative number, got {value}")]
    Index { field: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_shows_status_and_body() {
        let err = SubmissionError::request(500, "internal error");
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.to_string(), "API Error 500: internal error");
    }

    #[test]
    fn unknown_error_falls_back_on_empty_message() {
        assert_eq!(
            SubmissionError::unknown("  ").to_string(),
            UNKNOWN_ERROR_FALLBACK
        );
        assert_eq!(
            SubmissionError::unknown("connection refused").to_string(),
            "connection refused"
        );
    }
}
