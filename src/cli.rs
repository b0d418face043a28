//! Command execution behind the `shapefinder` binary.
//!
//! The binary parses arguments and installs logging; everything that reads
//! files, runs an analysis, or writes a report lives here so it can be
//! driven directly from tests.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use shapefinder_core::diagnostics::{CollectingSink, TracingSink};
use shapefinder_core::error::ShapeError;
use shapefinder_core::output::{
    emit_response, AnalysisInfo, AnalysisListResponse, ReportResponse,
};

use crate::analysis::{AnalysisOptions, AnalysisRegistry};
use crate::config::ReportFormat;
use crate::files::load_ast;

/// Resolved inputs for one analysis run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// JavaScript source file.
    pub path: PathBuf,
    /// ESTree document; defaults to the sibling `.estree.json`.
    pub ast: Option<PathBuf>,
    pub analysis: String,
    pub format: ReportFormat,
    pub all_scopes: bool,
}

/// Load the tree, run the named analysis, and write its report to `out`.
pub fn run_analysis(
    registry: &AnalysisRegistry,
    request: &RunRequest,
    out: &mut impl Write,
) -> Result<(), ShapeError> {
    let Some(analysis) = registry.lookup(&request.analysis) else {
        let registered = registry.names();
        tracing::error!("could not find an analysis named {}", request.analysis);
        tracing::warn!("registered analyses:\n\t{}", registered.join("\n\t"));
        tracing::error!("aborting");
        return Err(ShapeError::UnknownAnalysis {
            name: request.analysis.clone(),
            registered,
        });
    };

    let ast = load_ast(&request.path, request.ast.as_deref())?;
    let options = AnalysisOptions {
        all_scopes: request.all_scopes,
    };

    let started = Instant::now();
    match request.format {
        ReportFormat::Text => {
            let report = analysis.run(&ast, &options, &mut TracingSink)?;
            let duration_ms = finished(analysis.name(), started);
            write!(out, "{}", report.render_text()).map_err(write_error)?;
            writeln!(out, "Duration: {}ms", duration_ms).map_err(write_error)?;
        }
        ReportFormat::Json => {
            // Diagnostics are logged and also returned in the envelope.
            let mut sink = CollectingSink::traced();
            let report = analysis.run(&ast, &options, &mut sink)?;
            let duration_ms = finished(analysis.name(), started);
            let response = ReportResponse::new(
                analysis.name(),
                duration_ms,
                sink.into_diagnostics(),
                report,
            );
            emit_response(&response, out).map_err(write_error)?;
        }
    }
    out.flush().map_err(write_error)
}

fn finished(analysis: &str, started: Instant) -> u64 {
    let duration_ms = started.elapsed().as_millis() as u64;
    tracing::info!(analysis, duration_ms, "analysis finished");
    duration_ms
}

/// Write the registry listing to `out`.
pub fn list_analyses(
    registry: &AnalysisRegistry,
    format: ReportFormat,
    out: &mut impl Write,
) -> Result<(), ShapeError> {
    match format {
        ReportFormat::Text => {
            for analysis in registry.iter() {
                writeln!(out, "{}\t{}", analysis.name(), analysis.description())
                    .map_err(write_error)?;
            }
        }
        ReportFormat::Json => {
            let analyses = registry
                .iter()
                .map(|a| AnalysisInfo {
                    name: a.name().to_string(),
                    description: a.description().to_string(),
                })
                .collect();
            emit_response(&AnalysisListResponse::new(analyses), out).map_err(write_error)?;
        }
    }
    out.flush().map_err(write_error)
}

fn write_error(err: std::io::Error) -> ShapeError {
    ShapeError::internal(format!("failed to write output: {}", err))
}
