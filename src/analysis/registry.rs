//! Name-to-analysis lookup.

use super::{Analysis, MethodNameAnalysis, TypeFinderAnalysis};

/// Registered analyses, in registration order.
///
/// Built once at process start and passed to whatever needs it.
#[derive(Default)]
pub struct AnalysisRegistry {
    analyses: Vec<Box<dyn Analysis>>,
}

impl AnalysisRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in analysis.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TypeFinderAnalysis));
        registry.register(Box::new(MethodNameAnalysis));
        registry
    }

    pub fn register(&mut self, analysis: Box<dyn Analysis>) {
        tracing::trace!(name = analysis.name(), "registered analysis");
        self.analyses.push(analysis);
    }

    /// Case-insensitive lookup by name or alias.
    pub fn lookup(&self, name: &str) -> Option<&dyn Analysis> {
        self.analyses
            .iter()
            .find(|a| {
                a.name().eq_ignore_ascii_case(name)
                    || a.aliases().iter().any(|alias| alias.eq_ignore_ascii_case(name))
            })
            .map(Box::as_ref)
    }

    /// Primary names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.analyses.iter().map(|a| a.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Analysis> {
        self.analyses.iter().map(Box::as_ref)
    }
}
