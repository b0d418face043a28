//! Binary entry point for the shapefinder CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Infer usage per scope (reads app.estree.json next to app.js)
//! shapefinder --path app.js
//!
//! # Pick an analysis and a tree explicitly
//! shapefinder --path app.js --ast tree.json --analysis MethodNameReporter
//!
//! # Pipe a tree from a parser
//! acorn --ecma2020 app.js | shapefinder --path app.js --ast -
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use shapefinder::analysis::AnalysisRegistry;
use shapefinder::cli::{list_analyses, run_analysis, RunRequest};
use shapefinder::config::{Config, LogLevel, ReportFormat};
use shapefinder_core::error::{OutputErrorCode, ShapeError};
use shapefinder_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Usage inference over JavaScript syntax trees.
///
/// Reads a source file and the ESTree JSON a parser produced for it, runs
/// one named analysis, and prints its report.
#[derive(Parser, Debug)]
#[command(name = "shapefinder", version, about = "Usage inference over JavaScript syntax trees")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// JavaScript source file.
    #[arg(long, required_unless_present = "list")]
    path: Option<PathBuf>,

    /// ESTree JSON for the source (default: `<path-without-ext>.estree.json`, `-` for stdin).
    #[arg(long)]
    ast: Option<PathBuf>,

    /// Name of the analysis to run (default from config, else TypeFinder).
    #[arg(long, short = 'v', visible_alias = "visitor")]
    analysis: Option<String>,

    /// Include every scope in usage reports, not just function scopes.
    #[arg(long)]
    all_scopes: bool,

    /// List registered analyses and exit.
    #[arg(long)]
    list: bool,
}

/// Arguments that shape output and logging.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Output format (default from config, else text).
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Configuration file (default: ./shapefinder.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for tracing output (default from config, else warn).
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(err) => return report_error(&err, cli.global.format.unwrap_or_default()),
    };
    let format = cli.global.format.unwrap_or(config.report.format);

    init_tracing(cli.global.log_level.unwrap_or(config.log.level));

    match execute(cli, &config, format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err, format),
    }
}

fn load_config(global: &GlobalArgs) -> Result<Config, ShapeError> {
    let cwd = std::env::current_dir()
        .map_err(|e| ShapeError::internal(format!("failed to get current directory: {}", e)))?;
    Config::discover(global.config.as_deref(), &cwd)
}

/// Emit `err` in the requested format and map it to an exit code.
fn report_error(err: &ShapeError, format: ReportFormat) -> ExitCode {
    let error_code = OutputErrorCode::from(err);
    match format {
        ReportFormat::Json => {
            let response = ErrorResponse::from_error(err);
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();
        }
        ReportFormat::Text => {
            let _ = writeln!(io::stderr(), "error: {}", err);
        }
    }
    ExitCode::from(error_code.code())
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli, config: &Config, format: ReportFormat) -> Result<(), ShapeError> {
    let registry = AnalysisRegistry::with_defaults();
    let mut stdout = io::stdout().lock();

    if cli.list {
        return list_analyses(&registry, format, &mut stdout);
    }

    let path = cli
        .path
        .ok_or_else(|| ShapeError::invalid_args("--path is required"))?;
    let request = RunRequest {
        path,
        ast: cli.ast,
        analysis: cli
            .analysis
            .unwrap_or_else(|| config.analysis.default.clone()),
        format,
        all_scopes: cli.all_scopes || config.report.all_scopes,
    };
    run_analysis(&registry, &request, &mut stdout)
}
