//! JSON output types for CLI responses.
//!
//! Every JSON response carries `status` and `schema_version`. Success
//! responses wrap the analysis report; error responses wrap an
//! [`ErrorInfo`] whose `code` matches the process exit status.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::error::{OutputErrorCode, ShapeError};

/// Current schema version for JSON output.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Error Response
// ============================================================================

/// Error details in an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code (same value as the exit status).
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from a ShapeError.
    pub fn from_error(err: &ShapeError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a ShapeError.
    pub fn from_error(err: &ShapeError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }

    /// Create an error response with just code and message.
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code,
                message: message.into(),
                details: None,
            },
        }
    }
}

// ============================================================================
// Report Response
// ============================================================================

/// Success envelope around an analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse<R> {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Registered name of the analysis that ran.
    pub analysis: String,
    /// Wall-clock time spent in the analysis.
    pub duration_ms: u64,
    /// Diagnostics recorded during the run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// Analysis-specific payload.
    pub report: R,
}

impl<R> ReportResponse<R> {
    pub fn new(
        analysis: impl Into<String>,
        duration_ms: u64,
        diagnostics: Vec<Diagnostic>,
        report: R,
    ) -> Self {
        ReportResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            analysis: analysis.into(),
            duration_ms,
            diagnostics,
            report,
        }
    }
}

/// Registry listing for `--list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisListResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    pub analyses: Vec<AnalysisInfo>,
}

/// One registered analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub name: String,
    pub description: String,
}

impl AnalysisListResponse {
    pub fn new(analyses: Vec<AnalysisInfo>) -> Self {
        AnalysisListResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            analyses,
        }
    }
}

// ============================================================================
// Emitters
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
///
/// The output is deterministic: same input produces identical bytes.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
