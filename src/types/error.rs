//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Design Principles
//!
//! - Single unified error type (WeaveError) for the library
//! - Structured error variants with context for better debugging
//! - Per-file failures are reported, logged and skipped by callers; nothing here aborts a run

use thiserror::Error;

use crate::relations::HierarchyError;

#[derive(Debug, Error)]
pub enum WeaveError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Analysis Errors
    // -------------------------------------------------------------------------
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Invalid {language} query: {message}")]
    Query { language: String, message: String },

    #[error("No structurer for language: {0}")]
    UnsupportedLanguage(String),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    // -------------------------------------------------------------------------
    // Setup Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, WeaveError>;

impl WeaveError {
    /// Create a parse error for a file
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Whether this error only affects a single file (the batch can continue)
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::UnsupportedLanguage(_) | Self::Io(_) | Self::Query { .. }
        )
    }
}

impl From<tokio::task::JoinError> for WeaveError {
    fn from(err: tokio::task::JoinError) -> Self {
        WeaveError::Task(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = WeaveError::parse("src/Main.java", "Failed to parse Java file");
        assert_eq!(
            err.to_string(),
            "Parse error in src/Main.java: Failed to parse Java file"
        );
        assert!(err.is_per_file());
    }

    #[test]
    fn test_config_error_is_not_per_file() {
        let err = WeaveError::Config("max_concurrency must be greater than 0".to_string());
        assert!(!err.is_per_file());
    }

    #[test]
    fn test_hierarchy_error_is_transparent() {
        let err: WeaveError = HierarchyError::CycleDetected {
            cycle: vec!["a.A".to_string(), "a.B".to_string(), "a.A".to_string()],
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Inheritance cycle detected: a.A -> a.B -> a.A"
        );
    }
}
