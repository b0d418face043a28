//! Names of methods declared as function-valued object properties or class
//! members.

use serde::Serialize;
use shapefinder_ast::{
    try_resolve, walk_ast, Ast, FunctionExpression, Node, NodeKind, VisitResult, Visitor,
};
use shapefinder_core::diagnostics::DiagnosticSink;

use super::{Analysis, AnalysisError, AnalysisOptions, AnalysisReport};

/// Collects the key of every function expression that is the value of a
/// `Property` or `MethodDefinition`, in first-seen order.
///
/// Function expressions nested inside a collected method are not visited.
pub struct MethodNameCollector<'a> {
    ast: &'a Ast,
    names: Vec<String>,
}

impl<'a> MethodNameCollector<'a> {
    pub fn collect(ast: &'a Ast) -> Vec<String> {
        let mut collector = MethodNameCollector {
            ast,
            names: Vec::new(),
        };
        walk_ast(&mut collector, ast);
        collector.names
    }

    fn method_key(&self, node: &Node) -> Option<String> {
        let parent = self.ast.parent_node(node.id)?;
        let key = match &parent.kind {
            NodeKind::Property(prop) => prop.key,
            NodeKind::Other(other) if other.type_name == "MethodDefinition" => {
                other.node_field("key")?
            }
            _ => return None,
        };
        try_resolve(self.ast, key)
    }
}

impl<'a> Visitor<'a> for MethodNameCollector<'a> {
    fn visit_function_expression(
        &mut self,
        node: &'a Node,
        _data: &'a FunctionExpression,
    ) -> VisitResult {
        match self.method_key(node) {
            Some(name) => {
                if !self.names.contains(&name) {
                    self.names.push(name);
                }
                VisitResult::SkipChildren
            }
            None => VisitResult::Continue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodNameReport {
    pub methods: Vec<String>,
}

impl MethodNameReport {
    pub fn render_text(&self) -> String {
        let mut out = String::from("Found these methods:\n");
        for name in &self.methods {
            out.push_str("\t- ");
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

/// Registry entry for method-name reporting.
pub struct MethodNameAnalysis;

impl Analysis for MethodNameAnalysis {
    fn name(&self) -> &str {
        "MethodNameReporter"
    }

    fn description(&self) -> &str {
        "List methods declared as function-valued properties and class members"
    }

    fn aliases(&self) -> &[&str] {
        &["MethodNameReporterVisitor", "MethodNames"]
    }

    fn run(
        &self,
        ast: &Ast,
        _options: &AnalysisOptions,
        _sink: &mut dyn DiagnosticSink,
    ) -> Result<AnalysisReport, AnalysisError> {
        let methods = MethodNameCollector::collect(ast);
        tracing::info!(methods = methods.len(), "method names collected");
        Ok(AnalysisReport::MethodNames(MethodNameReport { methods }))
    }
}
