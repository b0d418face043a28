//! Usage inference: which names exist in which scope, what is assigned to
//! them, and which properties are read or written through them.
//!
//! The result is evidence only. Nothing here unifies the recorded values
//! into types; a caller reading the report sees the raw assignment history
//! and access set per name.
//!
//! # Scope boundaries
//!
//! `Program`, `BlockStatement`, the three `for` forms, `ObjectExpression`
//! and every function-like node open a scope on entry and close it on exit.
//! A `BlockStatement` that is the body of a function shares the function's
//! scope, so parameters and body-level declarations are siblings.

use serde::Serialize;
use shapefinder_ast::{
    binding_names, try_resolve, walk_ast, ArrowFunctionExpression, AssignmentExpression, Ast,
    BlockStatement, ForInStatement, ForOfStatement, ForStatement, FunctionDeclaration,
    FunctionExpression, MemberExpression, Node, NodeId, NodeKind, ObjectExpression, Program,
    VariableDeclarator, VisitResult, Visitor,
};
use shapefinder_core::diagnostics::DiagnosticSink;

use super::scope::{Declaration, Scope, ScopeError, ScopeTree, VariableTracker};
use super::{Analysis, AnalysisError, AnalysisOptions, AnalysisReport};

// ============================================================================
// Visitor
// ============================================================================

/// Visitor that builds a [`ScopeTree`] from one walk of the tree.
///
/// A scope contract violation is stored and the walk is stopped; the first
/// violation is the one reported.
pub struct TypeFinder<'a, 's> {
    ast: &'a Ast,
    scopes: ScopeTree,
    sink: &'s mut dyn DiagnosticSink,
    error: Option<ScopeError>,
}

impl<'a, 's> TypeFinder<'a, 's> {
    pub fn new(ast: &'a Ast, sink: &'s mut dyn DiagnosticSink) -> Self {
        TypeFinder {
            ast,
            scopes: ScopeTree::new(),
            sink,
            error: None,
        }
    }

    /// Walk `ast` and return the finished scope tree.
    pub fn collect(
        ast: &'a Ast,
        sink: &'s mut dyn DiagnosticSink,
    ) -> Result<ScopeTree, ScopeError> {
        let mut finder = TypeFinder::new(ast, sink);
        walk_ast(&mut finder, ast);
        match finder.error {
            Some(err) => Err(err),
            None => Ok(finder.scopes),
        }
    }

    fn fail(&mut self, err: ScopeError) -> VisitResult {
        tracing::debug!(error = %err, "stopping usage inference");
        if self.error.is_none() {
            self.error = Some(err);
        }
        VisitResult::Stop
    }

    /// Canonical value of `id`, or its source text when no rule applies.
    fn value_of(&self, id: NodeId) -> String {
        try_resolve(self.ast, id)
            .or_else(|| self.ast.text(id).map(str::to_string))
            .unwrap_or_default()
    }

    /// A reference key usable as a variable name.
    ///
    /// Keys whose root object does not resolve (`this.x` renders as `.x`)
    /// name nothing in scope.
    fn reference_key(&self, id: NodeId, offset: u64) -> Option<String> {
        let key = try_resolve(self.ast, id).unwrap_or_default();
        if key.is_empty() || key.starts_with('.') || key.starts_with('[') {
            tracing::debug!(offset, key = %key, "skipping reference with no named root");
            return None;
        }
        Some(key)
    }

    fn enter(&mut self, node: &'a Node, display_name: Option<&str>) -> VisitResult {
        self.scopes.push_scope(node, display_name);
        VisitResult::Continue
    }

    fn exit(&mut self) -> VisitResult {
        match self.scopes.pop_scope() {
            Ok(_) => VisitResult::Continue,
            Err(err) => self.fail(err),
        }
    }

    /// Open a function scope and declare every parameter binding in it.
    fn enter_function(&mut self, node: &'a Node, display_name: Option<&str>) -> VisitResult {
        self.scopes.push_scope(node, display_name);
        for &param in node.kind.params() {
            for binding in binding_names(self.ast, param) {
                let declaration = Declaration::of(&self.ast[binding.node]);
                if let Err(err) = self.scopes.register_declaration(&binding.name, declaration) {
                    return self.fail(err);
                }
            }
        }
        VisitResult::Continue
    }

    /// True if `node` is the block body of its parent function.
    fn is_function_body(&self, node: &Node) -> bool {
        self.ast
            .parent_node(node.id)
            .and_then(|parent| parent.kind.function_body())
            == Some(node.id)
    }

    /// Display name for a function expression: the key it is the value of,
    /// else the variant of its parent.
    fn function_expression_name(&self, node: &Node) -> Option<String> {
        let parent = self.ast.parent_node(node.id)?;
        match &parent.kind {
            NodeKind::Property(prop) => try_resolve(self.ast, prop.key),
            NodeKind::Other(other) if other.type_name == "MethodDefinition" => other
                .node_field("key")
                .and_then(|key| try_resolve(self.ast, key)),
            _ => Some(parent.type_name().to_string()),
        }
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }
}

/// Plain scope boundaries: open on visit, close on leave.
macro_rules! scope_boundaries {
    ($($base_name:ident: $node_type:ty),* $(,)?) => {
        paste::paste! {
            $(
                fn [<visit_ $base_name>](&mut self, node: &'a Node, _data: &'a $node_type) -> VisitResult {
                    self.enter(node, None)
                }

                fn [<leave_ $base_name>](&mut self, _node: &'a Node, _data: &'a $node_type) -> VisitResult {
                    self.exit()
                }
            )*
        }
    };
}

impl<'a> Visitor<'a> for TypeFinder<'a, '_> {
    scope_boundaries! {
        program: Program,
        for_statement: ForStatement,
        for_of_statement: ForOfStatement,
        for_in_statement: ForInStatement,
        object_expression: ObjectExpression,
    }

    fn visit_block_statement(&mut self, node: &'a Node, _data: &'a BlockStatement) -> VisitResult {
        if self.is_function_body(node) {
            return VisitResult::Continue;
        }
        self.enter(node, None)
    }

    fn leave_block_statement(&mut self, node: &'a Node, _data: &'a BlockStatement) -> VisitResult {
        if self.is_function_body(node) {
            return VisitResult::Continue;
        }
        self.exit()
    }

    fn visit_function_declaration(
        &mut self,
        node: &'a Node,
        data: &'a FunctionDeclaration,
    ) -> VisitResult {
        let name = data.id.and_then(|id| try_resolve(self.ast, id));
        self.enter_function(node, name.as_deref())
    }

    fn leave_function_declaration(
        &mut self,
        _node: &'a Node,
        _data: &'a FunctionDeclaration,
    ) -> VisitResult {
        self.exit()
    }

    fn visit_function_expression(
        &mut self,
        node: &'a Node,
        _data: &'a FunctionExpression,
    ) -> VisitResult {
        let name = self.function_expression_name(node);
        self.enter_function(node, name.as_deref())
    }

    fn leave_function_expression(
        &mut self,
        _node: &'a Node,
        _data: &'a FunctionExpression,
    ) -> VisitResult {
        self.exit()
    }

    fn visit_arrow_function_expression(
        &mut self,
        node: &'a Node,
        _data: &'a ArrowFunctionExpression,
    ) -> VisitResult {
        self.enter_function(node, None)
    }

    fn leave_arrow_function_expression(
        &mut self,
        _node: &'a Node,
        _data: &'a ArrowFunctionExpression,
    ) -> VisitResult {
        self.exit()
    }

    fn visit_variable_declarator(
        &mut self,
        _node: &'a Node,
        data: &'a VariableDeclarator,
    ) -> VisitResult {
        let initial = data.init.map(|init| self.value_of(init));
        let plain = matches!(self.ast[data.id].kind, NodeKind::Identifier(_));
        for binding in binding_names(self.ast, data.id) {
            let declaration = Declaration::of(&self.ast[binding.node]);
            match self.scopes.register_declaration(&binding.name, declaration) {
                Ok(tracker) => {
                    // A destructured name does not receive the whole initializer.
                    if let (true, Some(value)) = (plain, &initial) {
                        tracker.assignments.push(value.clone());
                    }
                }
                Err(err) => return self.fail(err),
            }
        }
        VisitResult::Continue
    }

    fn visit_assignment_expression(
        &mut self,
        node: &'a Node,
        data: &'a AssignmentExpression,
    ) -> VisitResult {
        let target = match &self.ast[data.left].kind {
            NodeKind::Identifier(ident) => Some(ident.name.clone()),
            NodeKind::MemberExpression(member) => self.reference_key(member.object, node.start()),
            _ => {
                tracing::debug!(offset = node.start(), "skipping pattern assignment target");
                None
            }
        };
        if let Some(target) = target {
            let value = self.value_of(data.right);
            self.scopes
                .record_assignment(&target, &value, node.start(), &mut *self.sink);
        }
        VisitResult::Continue
    }

    fn visit_member_expression(
        &mut self,
        node: &'a Node,
        data: &'a MemberExpression,
    ) -> VisitResult {
        if let Some(object) = self.reference_key(data.object, node.start()) {
            let property = self.value_of(data.property);
            self.scopes
                .record_access(&object, &property, node.start(), &mut *self.sink);
        }
        VisitResult::Continue
    }
}

// ============================================================================
// Report
// ============================================================================

/// Serializable view of a finished [`ScopeTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeFinderReport {
    pub scopes: Vec<ScopeReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeReport {
    pub key: String,
    pub name: String,
    pub kind: String,
    pub start: u64,
    pub end: u64,
    pub variables: Vec<VariableReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableReport {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_at: Option<u64>,
    pub implicit: bool,
    pub assignments: Vec<String>,
    pub accesses: Vec<String>,
}

impl From<&VariableTracker> for VariableReport {
    fn from(tracker: &VariableTracker) -> Self {
        VariableReport {
            identifier: tracker.identifier.clone(),
            declared_at: tracker.declared_at(),
            implicit: tracker.implicit,
            assignments: tracker.assignments.clone(),
            accesses: tracker.accesses.iter().cloned().collect(),
        }
    }
}

impl ScopeReport {
    fn from_scope(scope: &Scope) -> Option<Self> {
        let span = scope.span?;
        Some(ScopeReport {
            key: scope.key.clone(),
            name: scope.name.clone(),
            kind: scope.kind.clone().unwrap_or_default(),
            start: span.start,
            end: span.end,
            variables: scope.variables.values().map(VariableReport::from).collect(),
        })
    }

    pub fn variable(&self, identifier: &str) -> Option<&VariableReport> {
        self.variables.iter().find(|v| v.identifier == identifier)
    }

    fn is_function_like(&self) -> bool {
        self.kind.contains("Function")
    }
}

impl TypeFinderReport {
    /// Flatten `tree`, order scopes by start offset, and keep function
    /// scopes only unless `all_scopes` is set. The root sentinel is never
    /// reported.
    pub fn from_tree(tree: &ScopeTree, all_scopes: bool) -> Self {
        let mut scopes: Vec<ScopeReport> = tree
            .flatten()
            .into_iter()
            .filter_map(|id| ScopeReport::from_scope(&tree[id]))
            .filter(|scope| all_scopes || scope.is_function_like())
            .collect();
        scopes.sort_by_key(|scope| scope.start);
        TypeFinderReport { scopes }
    }

    pub fn scope_named(&self, name: &str) -> Option<&ScopeReport> {
        self.scopes.iter().find(|s| s.name == name)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for scope in &self.scopes {
            if scope.name == scope.key {
                out.push_str(&format!("{}:\n", scope.key));
            } else {
                out.push_str(&format!("{}: {}\n", scope.name, scope.key));
            }
            if scope.variables.is_empty() {
                out.push_str("  (no variables)\n");
            }
            for var in &scope.variables {
                out.push_str("  - ");
                out.push_str(&var.identifier);
                if var.implicit {
                    out.push_str(" (implicit)");
                }
                if !var.assignments.is_empty() {
                    let quoted: Vec<String> =
                        var.assignments.iter().map(|a| format!("\"{}\"", a)).collect();
                    out.push_str(&format!(" assignments: [{}]", quoted.join(", ")));
                }
                if !var.accesses.is_empty() {
                    out.push_str(&format!(" accesses: {{{}}}", var.accesses.join(", ")));
                }
                out.push('\n');
            }
        }
        out
    }
}

// ============================================================================
// Analysis
// ============================================================================

/// Registry entry for usage inference.
pub struct TypeFinderAnalysis;

impl Analysis for TypeFinderAnalysis {
    fn name(&self) -> &str {
        "TypeFinder"
    }

    fn description(&self) -> &str {
        "Record declarations, assignments and property accesses per scope"
    }

    fn aliases(&self) -> &[&str] {
        &["TypeFinderVisitor"]
    }

    fn run(
        &self,
        ast: &Ast,
        options: &AnalysisOptions,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<AnalysisReport, AnalysisError> {
        let tree = TypeFinder::collect(ast, sink).map_err(|source| AnalysisError::Scope {
            analysis: self.name().to_string(),
            source,
        })?;
        let report = TypeFinderReport::from_tree(&tree, options.all_scopes);
        tracing::info!(scopes = report.scopes.len(), "usage inference complete");
        Ok(AnalysisReport::TypeFinder(report))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shapefinder_core::diagnostics::CollectingSink;

    fn ident(name: &str, start: u64) -> serde_json::Value {
        json!({"type": "Identifier", "start": start, "end": start + name.len() as u64, "name": name})
    }

    fn run(ast: &Ast, all_scopes: bool) -> (TypeFinderReport, CollectingSink) {
        let mut sink = CollectingSink::new();
        let tree = TypeFinder::collect(ast, &mut sink).unwrap();
        (TypeFinderReport::from_tree(&tree, all_scopes), sink)
    }

    /// `let a = 1; a = b;`
    fn reassignment() -> Ast {
        let source = "let a = 1; a = b;";
        let tree = json!({
            "type": "Program", "start": 0, "end": 17, "sourceType": "script",
            "body": [
                {"type": "VariableDeclaration", "start": 0, "end": 10, "kind": "let",
                 "declarations": [{"type": "VariableDeclarator", "start": 4, "end": 9,
                    "id": ident("a", 4),
                    "init": {"type": "Literal", "start": 8, "end": 9, "value": 1, "raw": "1"}}]},
                {"type": "ExpressionStatement", "start": 11, "end": 17,
                 "expression": {"type": "AssignmentExpression", "start": 11, "end": 16,
                    "operator": "=", "left": ident("a", 11), "right": ident("b", 15)}}
            ]
        });
        Ast::from_estree_value(source, &tree).unwrap()
    }

    #[test]
    fn program_scope_holds_top_level_names() {
        let ast = reassignment();
        let (report, sink) = run(&ast, true);
        assert_eq!(report.scopes.len(), 1);
        let program = &report.scopes[0];
        assert_eq!(program.key, "(Program) 0:17");
        let a = program.variable("a").unwrap();
        assert_eq!(a.assignments, vec!["1", "b"]);
        assert_eq!(a.declared_at, Some(4));
        assert!(!a.implicit);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn function_filter_hides_program_scope() {
        let ast = reassignment();
        let (report, _) = run(&ast, false);
        assert!(report.scopes.is_empty());
    }

    #[test]
    fn this_member_is_skipped() {
        // this.x = 1;
        let source = "this.x = 1;";
        let tree = json!({
            "type": "Program", "start": 0, "end": 11,
            "body": [{"type": "ExpressionStatement", "start": 0, "end": 11,
                "expression": {"type": "AssignmentExpression", "start": 0, "end": 10, "operator": "=",
                    "left": {"type": "MemberExpression", "start": 0, "end": 6, "computed": false,
                        "object": {"type": "ThisExpression", "start": 0, "end": 4},
                        "property": ident("x", 5)},
                    "right": {"type": "Literal", "start": 9, "end": 10, "value": 1, "raw": "1"}}}]
        });
        let ast = Ast::from_estree_value(source, &tree).unwrap();
        let (report, sink) = run(&ast, true);
        assert!(report.scopes[0].variables.is_empty());
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn unresolved_init_uses_source_text_after_non_ascii() {
        // Offsets count "ü" as one UTF-16 unit.
        let source = "// ü\nlet t = [1];";
        let tree = json!({
            "type": "Program", "start": 0, "end": 17,
            "body": [{"type": "VariableDeclaration", "start": 5, "end": 17, "kind": "let",
                "declarations": [{"type": "VariableDeclarator", "start": 9, "end": 16,
                    "id": ident("t", 9),
                    "init": {"type": "ArrayExpression", "start": 13, "end": 16, "elements": [
                        {"type": "Literal", "start": 14, "end": 15, "value": 1, "raw": "1"}]}}]}]
        });
        let ast = Ast::from_estree_value(source, &tree).unwrap();
        let (report, _) = run(&ast, true);
        let t = report.scopes[0].variable("t").unwrap();
        assert_eq!(t.assignments, vec!["[1]"]);
        assert_eq!(t.declared_at, Some(9));
    }

    #[test]
    fn arrow_body_block_shares_scope() {
        // (p) => { let q = p; }
        let source = "(p) => { let q = p; }";
        let tree = json!({
            "type": "ArrowFunctionExpression", "start": 0, "end": 21, "expression": false,
            "async": false, "params": [ident("p", 1)],
            "body": {"type": "BlockStatement", "start": 7, "end": 21, "body": [
                {"type": "VariableDeclaration", "start": 9, "end": 19, "kind": "let",
                 "declarations": [{"type": "VariableDeclarator", "start": 13, "end": 18,
                    "id": ident("q", 13), "init": ident("p", 17)}]}
            ]}
        });
        let ast = Ast::from_estree_value(source, &tree).unwrap();
        let (report, _) = run(&ast, true);
        assert_eq!(report.scopes.len(), 1);
        let arrow = &report.scopes[0];
        assert_eq!(arrow.name, "(ArrowFunctionExpression) 0:21");
        assert_eq!(arrow.variable("p").unwrap().assignments, Vec::<String>::new());
        assert_eq!(arrow.variable("q").unwrap().assignments, vec!["p"]);
    }

    #[test]
    fn duplicate_parameter_stops_walk() {
        // function f(a, a) {}
        let source = "function f(a, a) {}";
        let tree = json!({
            "type": "FunctionDeclaration", "start": 0, "end": 19, "async": false, "generator": false,
            "id": ident("f", 9), "params": [ident("a", 11), ident("a", 14)],
            "body": {"type": "BlockStatement", "start": 17, "end": 19, "body": []}
        });
        let ast = Ast::from_estree_value(source, &tree).unwrap();
        let mut sink = CollectingSink::new();
        let err = TypeFinder::collect(&ast, &mut sink).unwrap_err();
        assert_eq!(
            err,
            ScopeError::DuplicateDeclaration {
                name: "a".to_string(),
                offset: 14
            }
        );
    }

    #[test]
    fn render_text_lists_variables() {
        let report = TypeFinderReport {
            scopes: vec![ScopeReport {
                key: "(FunctionDeclaration) 0:10".to_string(),
                name: "f".to_string(),
                kind: "FunctionDeclaration".to_string(),
                start: 0,
                end: 10,
                variables: vec![
                    VariableReport {
                        identifier: "a".to_string(),
                        declared_at: Some(11),
                        implicit: false,
                        assignments: vec!["{}".to_string(), "5".to_string()],
                        accesses: vec!["x".to_string(), "y".to_string()],
                    },
                    VariableReport {
                        identifier: "g".to_string(),
                        declared_at: None,
                        implicit: true,
                        assignments: vec![],
                        accesses: vec![],
                    },
                ],
            }],
        };
        assert_eq!(
            report.render_text(),
            "f: (FunctionDeclaration) 0:10\n  - a assignments: [\"{}\", \"5\"] accesses: {x, y}\n  - g (implicit)\n"
        );
    }
}
