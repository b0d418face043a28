//! Conversions from analysis errors into the unified `ShapeError`.
//!
//! These bridges live in the root crate because `ShapeError` sits in
//! `shapefinder-core`, which does not depend on the analyses. The loader's
//! `AstError` bridge lives next to `AstError` in `shapefinder-ast`.

use shapefinder_core::error::ShapeError;

use crate::analysis::AnalysisError;

// ============================================================================
// Bridge: AnalysisError -> ShapeError
// ============================================================================

impl From<AnalysisError> for ShapeError {
    fn from(err: AnalysisError) -> Self {
        let offset = err.offset();
        match err {
            AnalysisError::Scope { analysis, source } => ShapeError::AnalysisFailed {
                analysis,
                message: source.to_string(),
                offset,
            },
        }
    }
}
