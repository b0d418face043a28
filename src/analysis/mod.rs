//! Analyses that run over a loaded tree.
//!
//! Each analysis implements [`Analysis`] and is registered by name in an
//! [`AnalysisRegistry`]. The CLI looks one up, runs it, and prints the
//! [`AnalysisReport`] it returns.

pub mod method_names;
pub mod registry;
pub mod scope;
pub mod type_finder;

use serde::Serialize;
use shapefinder_ast::Ast;
use shapefinder_core::diagnostics::DiagnosticSink;
use thiserror::Error;

pub use method_names::{MethodNameAnalysis, MethodNameCollector, MethodNameReport};
pub use registry::AnalysisRegistry;
pub use scope::{Scope, ScopeError, ScopeId, ScopeTree, VariableTracker};
pub use type_finder::{
    ScopeReport, TypeFinder, TypeFinderAnalysis, TypeFinderReport, VariableReport,
};

/// Knobs shared by every analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Report every scope instead of function scopes only.
    pub all_scopes: bool,
}

/// Failure of an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{analysis}: {source}")]
    Scope {
        analysis: String,
        #[source]
        source: ScopeError,
    },
}

impl AnalysisError {
    pub fn analysis(&self) -> &str {
        match self {
            AnalysisError::Scope { analysis, .. } => analysis,
        }
    }

    pub fn offset(&self) -> Option<u64> {
        match self {
            AnalysisError::Scope { source, .. } => source.offset(),
        }
    }
}

/// Output of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    TypeFinder(TypeFinderReport),
    MethodNames(MethodNameReport),
}

impl AnalysisReport {
    pub fn render_text(&self) -> String {
        match self {
            AnalysisReport::TypeFinder(report) => report.render_text(),
            AnalysisReport::MethodNames(report) => report.render_text(),
        }
    }
}

/// A named analysis over a syntax tree.
pub trait Analysis {
    /// Name used for lookup and in reports.
    fn name(&self) -> &str;

    /// One-line description for `--list`.
    fn description(&self) -> &str;

    /// Additional names that resolve to this analysis.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Run over `ast`, reporting recoverable anomalies to `sink`.
    fn run(
        &self,
        ast: &Ast,
        options: &AnalysisOptions,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<AnalysisReport, AnalysisError>;
}
