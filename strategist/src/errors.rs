//! Error types for the strategist pipeline.
//!
//! True failures (a generation call that did not complete, a raw result with
//! no recoverable text, bad configuration) are error variants. Expected
//! "field absent" conditions during extraction are `Option`s and never
//! surface here.

use crate::output::ExtractionMethod;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// The main error type for strategist operations.
#[derive(Debug, Error)]
pub enum StrategistError {
    /// The text-generation call failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// No usable text could be recovered from a raw result.
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StrategistError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors raised by a text-generation backend.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The request could not be delivered (network failure, connection reset).
    #[error("Generation request failed: {0}")]
    Request(String),

    /// The backend did not answer in time.
    #[error("Generation timed out after {seconds}s")]
    Timeout {
        /// The timeout that elapsed.
        seconds: f64,
    },

    /// The backend answered with a non-success status.
    #[error("Generation backend returned status {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Body or reason returned by the backend.
        message: String,
    },

    /// The backend answered but the response could not be decoded.
    #[error("Malformed generation response: {0}")]
    Malformed(String),

    /// The backend stopped on its iteration or time budget before finishing.
    #[error("Generation stopped on its iteration/time budget: {0}")]
    BudgetExhausted(String),

    /// The request itself was rejected before being sent.
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Stable snake_case name of the variant.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Request(_) => "request_error",
            Self::Timeout { .. } => "timeout",
            Self::Api { .. } => "api_error",
            Self::Malformed(_) => "malformed_response",
            Self::BudgetExhausted(_) => "budget_exhausted",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.error_type()));
        match self {
            Self::Timeout { seconds } => {
                map.insert("timeout_seconds".to_string(), serde_json::json!(seconds));
            }
            Self::Api { status, .. } => {
                map.insert("status".to_string(), serde_json::json!(status));
            }
            _ => {}
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Why extraction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionErrorKind {
    /// No extraction method produced a qualifying string.
    AllMethodsExhausted,
    /// A string was located but cleaning left nothing of it.
    EmptyAfterCleaning,
}

impl fmt::Display for ExtractionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllMethodsExhausted => write!(f, "all_methods_exhausted"),
            Self::EmptyAfterCleaning => write!(f, "empty_after_cleaning"),
        }
    }
}

/// Error raised when no usable text can be recovered from a raw result.
#[derive(Debug, Clone, Error)]
#[error("Extraction failed ({kind}) after trying [{}]; raw preview: {preview:?}", format_methods(.attempted))]
pub struct ExtractionError {
    /// Failure kind.
    pub kind: ExtractionErrorKind,
    /// Methods tried, in order.
    pub attempted: Vec<ExtractionMethod>,
    /// Truncated rendering of the raw result for diagnostics.
    pub preview: String,
}

fn format_methods(methods: &[ExtractionMethod]) -> String {
    methods
        .iter()
        .map(ExtractionMethod::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExtractionError {
    /// Creates an error for a raw result none of the methods could read.
    #[must_use]
    pub fn exhausted(attempted: Vec<ExtractionMethod>, preview: impl Into<String>) -> Self {
        Self {
            kind: ExtractionErrorKind::AllMethodsExhausted,
            attempted,
            preview: preview.into(),
        }
    }

    /// Creates an error for text that cleaning reduced to nothing.
    #[must_use]
    pub fn empty_after_cleaning(method: ExtractionMethod, preview: impl Into<String>) -> Self {
        Self {
            kind: ExtractionErrorKind::EmptyAfterCleaning,
            attempted: vec![method],
            preview: preview.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("extraction_error"));
        map.insert("kind".to_string(), serde_json::json!(self.kind));
        map.insert(
            "attempted".to_string(),
            serde_json::json!(self.attempted.iter().map(ExtractionMethod::as_str).collect::<Vec<_>>()),
        );
        map.insert("preview".to_string(), serde_json::json!(self.preview));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable or field held a value that could not be parsed or is out of range.
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// The variable or field name.
        key: String,
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// The file path.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be parsed.
    #[error("Failed to parse config file {path}: {message}")]
    Parse {
        /// The file path.
        path: String,
        /// Parser message.
        message: String,
    },
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_to_dict() {
        let err = GenerationError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "api_error");
        assert_eq!(dict.get("status").unwrap(), 503);
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn test_generation_error_types_are_distinct() {
        let errors = [
            GenerationError::Request("reset".into()),
            GenerationError::Timeout { seconds: 30.0 },
            GenerationError::Api { status: 500, message: String::new() },
            GenerationError::Malformed("eof".into()),
            GenerationError::BudgetExhausted("research".into()),
            GenerationError::InvalidRequest("empty prompt".into()),
        ];
        let mut names: Vec<_> = errors.iter().map(GenerationError::error_type).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), errors.len());
    }

    #[test]
    fn test_extraction_error_message() {
        let err = ExtractionError::exhausted(
            vec![ExtractionMethod::Raw, ExtractionMethod::StringConversion],
            "{}",
        );

        assert_eq!(err.kind, ExtractionErrorKind::AllMethodsExhausted);
        assert!(err.to_string().contains("raw, string_conversion"));
        assert_eq!(err.to_dict().get("kind").unwrap(), "all_methods_exhausted");
    }

    #[test]
    fn test_strategist_error_from_variants() {
        let err: StrategistError = GenerationError::Timeout { seconds: 5.0 }.into();
        assert!(matches!(err, StrategistError::Generation(_)));

        let err: StrategistError = ConfigError::invalid_value("K", "x", "not a number").into();
        assert!(err.to_string().contains("not a number"));
    }
}
