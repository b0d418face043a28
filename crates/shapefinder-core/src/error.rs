//! Error types and exit code constants for shapefinder.
//!
//! This module provides a unified error type (`ShapeError`) that the
//! layer-specific errors (syntax tree loading, scope bookkeeping, analysis
//! dispatch) are bridged into before they reach the CLI.
//!
//! ## Exit Code Mapping
//!
//! - `2`: Invalid arguments (unknown analysis, bad configuration)
//! - `3`: Resolution errors (input file missing or unreadable)
//! - `4`: Malformed syntax tree (the ESTree document could not be loaded)
//! - `5`: Analysis failed (a traversal contract was violated)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes shared by JSON error responses and the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (unknown analysis name, bad config).
    InvalidArguments = 2,
    /// An input file could not be found or read.
    ResolutionError = 3,
    /// The syntax tree document is not valid ESTree.
    MalformedTree = 4,
    /// An analysis aborted on a contract violation.
    AnalysisFailed = 5,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The requested analysis is not in the registry.
    #[error("could not find an analysis named '{name}'")]
    UnknownAnalysis {
        name: String,
        registered: Vec<String>,
    },

    /// Configuration file could not be parsed.
    #[error("configuration error in {path}: {message}")]
    ConfigError { path: String, message: String },

    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Input file exists but could not be read.
    #[error("failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    /// The syntax tree document could not be loaded.
    #[error("malformed syntax tree: {message}")]
    MalformedTree {
        message: String,
        offset: Option<u64>,
    },

    /// An analysis aborted because a traversal invariant was broken.
    #[error("analysis '{analysis}' failed: {message}")]
    AnalysisFailed {
        analysis: String,
        message: String,
        offset: Option<u64>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&ShapeError> for OutputErrorCode {
    fn from(err: &ShapeError) -> Self {
        match err {
            ShapeError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            ShapeError::UnknownAnalysis { .. } => OutputErrorCode::InvalidArguments,
            ShapeError::ConfigError { .. } => OutputErrorCode::InvalidArguments,
            ShapeError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            ShapeError::ReadError { .. } => OutputErrorCode::ResolutionError,
            ShapeError::MalformedTree { .. } => OutputErrorCode::MalformedTree,
            ShapeError::AnalysisFailed { .. } => OutputErrorCode::AnalysisFailed,
            ShapeError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl ShapeError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        ShapeError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        ShapeError::FileNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ShapeError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }

    /// Extra structured context for JSON error responses.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShapeError::InvalidArguments { details, .. } => details.clone(),
            ShapeError::UnknownAnalysis { registered, .. } => {
                Some(serde_json::json!({ "registered": registered }))
            }
            ShapeError::MalformedTree {
                offset: Some(offset),
                ..
            }
            | ShapeError::AnalysisFailed {
                offset: Some(offset),
                ..
            } => Some(serde_json::json!({ "offset": offset })),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod error_code_mapping {
        use super::*;

        #[test]
        fn unknown_analysis_maps_to_invalid_arguments() {
            let err = ShapeError::UnknownAnalysis {
                name: "nope".to_string(),
                registered: vec!["TypeFinder".to_string()],
            };
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
            assert_eq!(err.error_code().code(), 2);
        }

        #[test]
        fn file_not_found_maps_to_resolution_error() {
            let err = ShapeError::file_not_found("missing.js");
            assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
            assert_eq!(err.error_code().code(), 3);
        }

        #[test]
        fn malformed_tree_maps_to_malformed_tree() {
            let err = ShapeError::MalformedTree {
                message: "missing field".to_string(),
                offset: Some(4),
            };
            assert_eq!(err.error_code().code(), 4);
        }

        #[test]
        fn analysis_failed_maps_to_analysis_failed() {
            let err = ShapeError::AnalysisFailed {
                analysis: "TypeFinder".to_string(),
                message: "duplicate declaration".to_string(),
                offset: None,
            };
            assert_eq!(err.error_code(), OutputErrorCode::AnalysisFailed);
            assert_eq!(err.error_code().code(), 5);
        }

        #[test]
        fn internal_error_maps_to_internal_error() {
            let err = ShapeError::internal("unexpected state");
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod error_display {
        use super::*;

        #[test]
        fn unknown_analysis_display() {
            let err = ShapeError::UnknownAnalysis {
                name: "Bogus".to_string(),
                registered: vec![],
            };
            assert_eq!(err.to_string(), "could not find an analysis named 'Bogus'");
        }

        #[test]
        fn analysis_failed_display() {
            let err = ShapeError::AnalysisFailed {
                analysis: "TypeFinder".to_string(),
                message: "tried to pop the root scope".to_string(),
                offset: None,
            };
            assert_eq!(
                err.to_string(),
                "analysis 'TypeFinder' failed: tried to pop the root scope"
            );
        }
    }

    #[test]
    fn details_carry_registered_names_and_offsets() {
        let err = ShapeError::UnknownAnalysis {
            name: "x".to_string(),
            registered: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            err.details(),
            Some(serde_json::json!({ "registered": ["A", "B"] }))
        );

        let err = ShapeError::AnalysisFailed {
            analysis: "TypeFinder".to_string(),
            message: "dup".to_string(),
            offset: Some(17),
        };
        assert_eq!(err.details(), Some(serde_json::json!({ "offset": 17 })));
        assert_eq!(ShapeError::internal("x").details(), None);
    }
}
