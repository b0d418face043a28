//! Leveled diagnostics emitted while an analysis walks a tree.
//!
//! Analyses never log directly. They hand [`Diagnostic`] values to a
//! [`DiagnosticSink`] supplied by the caller. Text-mode CLI runs install a
//! [`TracingSink`]; JSON runs install [`CollectingSink::traced`] so the
//! diagnostics also land in the report. Tests install a plain
//! [`CollectingSink`] and assert on what was recorded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single message produced during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable machine-readable code, e.g. `implicit_access`.
    pub code: String,
    pub message: String,
    /// Source offset the diagnostic refers to, in producer units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            code: code.into(),
            message: message.into(),
            offset: None,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn debug(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Debug, code, message)
    }

    /// Attach a source offset.
    pub fn at(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn record(&mut self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, diagnostic: Diagnostic) {
        (**self).record(diagnostic)
    }
}

/// Forwards each diagnostic to the matching `tracing` macro.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, d: Diagnostic) {
        forward_to_tracing(&d);
    }
}

fn forward_to_tracing(d: &Diagnostic) {
    match d.severity {
        Severity::Debug => tracing::debug!(code = %d.code, offset = ?d.offset, "{}", d.message),
        Severity::Info => tracing::info!(code = %d.code, offset = ?d.offset, "{}", d.message),
        Severity::Warning => tracing::warn!(code = %d.code, offset = ?d.offset, "{}", d.message),
        Severity::Error => tracing::error!(code = %d.code, offset = ?d.offset, "{}", d.message),
    }
}

/// Keeps every diagnostic in memory.
///
/// With [`CollectingSink::traced`] the diagnostics are also forwarded to
/// `tracing`.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
    trace: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traced() -> Self {
        CollectingSink {
            diagnostics: Vec::new(),
            trace: true,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics at `Warning` or above.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity >= Severity::Warning)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        if self.trace {
            forward_to_tracing(&diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }
}
