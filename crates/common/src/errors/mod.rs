//! Error types for LearnPilot
//!
//! Provides the error taxonomy shared by the curriculum engine and the
//! pipeline:
//! - Distinct error types for input, lookup, and internal failures
//! - Machine-readable error codes grouped by family
//! - Conversions from the serialization, I/O, and config layers

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    InvalidPaper,
    DuplicatePaper,

    // Resource errors (4xxx)
    PaperNotFound,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
    IoError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::InvalidPaper => 1002,
            ErrorCode::DuplicatePaper => 1003,

            // Resources (4xxx)
            ErrorCode::PaperNotFound => 4001,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
            ErrorCode::IoError => 9004,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Invalid paper {paper_id}: {message}")]
    InvalidPaper { paper_id: String, message: String },

    #[error("Duplicate paper id: {id}")]
    DuplicatePaper { id: String },

    // Resource errors
    #[error("Paper not found: {id}")]
    PaperNotFound { id: String },

    // Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for an `InvalidPaper` error
    pub fn invalid_paper(paper_id: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::InvalidPaper {
            paper_id: paper_id.into(),
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::InvalidPaper { .. } => ErrorCode::InvalidPaper,
            AppError::DuplicatePaper { .. } => ErrorCode::DuplicatePaper,
            AppError::PaperNotFound { .. } => ErrorCode::PaperNotFound,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Check if this error was caused by the caller's input
    /// (malformed batch or unknown paper id) rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(self.code().as_code(), 1000..=1999 | 4000..=4999)
    }

    /// The paper id this error refers to, if any
    pub fn paper_id(&self) -> Option<&str> {
        match self {
            AppError::InvalidPaper { paper_id, .. } => Some(paper_id),
            AppError::DuplicatePaper { id } | AppError::PaperNotFound { id } => Some(id),
            _ => None,
        }
    }
}

impl From<::config::ConfigError> for AppError {
    fn from(err: ::config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::PaperNotFound { id: "P9".into() };
        assert_eq!(err.code(), ErrorCode::PaperNotFound);
        assert_eq!(err.code().as_code(), 4001);
        assert_eq!(err.paper_id(), Some("P9"));
        assert_eq!(err.to_string(), "Paper not found: P9");
    }

    #[test]
    fn test_invalid_paper_names_id() {
        let err = AppError::invalid_paper("P2", "concepts must be a list of strings");
        assert_eq!(err.code(), ErrorCode::InvalidPaper);
        assert!(err.is_input_error());
        assert!(err.to_string().contains("P2"));
        assert_eq!(err.paper_id(), Some("P2"));
    }

    #[test]
    fn test_internal_errors_are_not_input_errors() {
        let err = AppError::Internal {
            message: "Something went wrong".into(),
        };
        assert!(!err.is_input_error());
        assert_eq!(err.paper_id(), None);

        let err = AppError::Configuration {
            message: "daily_hours must be positive".into(),
        };
        assert_eq!(err.code().as_code(), 9002);
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert_eq!(err.code(), ErrorCode::SerializationError);
    }

    #[test]
    fn test_every_code_is_produced_by_an_error() {
        let errors = [
            AppError::Validation { message: "bad".into(), field: None },
            AppError::invalid_paper("P1", "bad"),
            AppError::DuplicatePaper { id: "P1".into() },
            AppError::PaperNotFound { id: "P1".into() },
            AppError::Internal { message: "bad".into() },
            AppError::Configuration { message: "bad".into() },
            serde_json::from_str::<serde_json::Value>("{").unwrap_err().into(),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into(),
        ];

        let mut codes: Vec<u16> = errors.iter().map(|e| e.code().as_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes, vec![1001, 1002, 1003, 4001, 9001, 9002, 9003, 9004]);
    }

    #[test]
    fn test_error_code_serializes_screaming_case() {
        let json = serde_json::to_string(&ErrorCode::PaperNotFound).unwrap();
        assert_eq!(json, "\"PAPER_NOT_FOUND\"");
    }
}
