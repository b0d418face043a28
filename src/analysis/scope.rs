//! Lexical scope model for usage inference.
//!
//! Scopes live in an arena ([`ScopeTree`]) addressed by [`ScopeId`]. Each
//! scope stores its parent id and the ids of its children, so the finished
//! tree stays inspectable after traversal has moved the cursor back to the
//! root.
//!
//! # Identity
//!
//! A scope is keyed by the variant and span of the node that opened it,
//! e.g. `(FunctionDeclaration) 0:54`. Spans are unique within one tree, so
//! keys are too. The root is a sentinel keyed `root` with no span.
//!
//! # Lookup
//!
//! Accesses and assignments resolve a name in the current scope, then in
//! each ancestor. A name with no visible declaration gets an implicit
//! tracker in the current scope and a warning diagnostic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Index;

use serde::Serialize;
use shapefinder_ast::{Node, NodeId, Span};
use shapefinder_core::diagnostics::{Diagnostic, DiagnosticSink};
use thiserror::Error;

/// Key of the sentinel root scope.
pub const ROOT_SCOPE_KEY: &str = "root";

// ============================================================================
// Errors
// ============================================================================

/// Contract violations raised by the scope model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// `pop_scope` was called with the root as the current scope.
    #[error("tried to pop the root scope")]
    PopRoot,

    /// A name was declared twice directly in one scope.
    #[error("multiple declarations of variable {name} (see position {offset})")]
    DuplicateDeclaration { name: String, offset: u64 },
}

impl ScopeError {
    pub fn offset(&self) -> Option<u64> {
        match self {
            ScopeError::PopRoot => None,
            ScopeError::DuplicateDeclaration { offset, .. } => Some(*offset),
        }
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Index of a scope in its [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope_{}", self.0)
    }
}

/// The node a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    pub node: NodeId,
    pub span: Span,
}

impl Declaration {
    pub fn of(node: &Node) -> Self {
        Declaration {
            node: node.id,
            span: node.span,
        }
    }
}

// ============================================================================
// Variable Tracker
// ============================================================================

/// Everything observed about one name within one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableTracker {
    pub identifier: String,
    #[serde(skip)]
    pub declaration: Option<Declaration>,
    /// Right-hand sides assigned to the name, in traversal order.
    pub assignments: Vec<String>,
    /// Property names read or written through the name.
    pub accesses: BTreeSet<String>,
    /// Synthesized for a reference with no visible declaration.
    pub implicit: bool,
}

impl VariableTracker {
    fn declared(identifier: &str, declaration: Declaration) -> Self {
        VariableTracker {
            identifier: identifier.to_string(),
            declaration: Some(declaration),
            assignments: Vec::new(),
            accesses: BTreeSet::new(),
            implicit: false,
        }
    }

    fn implicit(identifier: &str) -> Self {
        VariableTracker {
            identifier: identifier.to_string(),
            declaration: None,
            assignments: Vec::new(),
            accesses: BTreeSet::new(),
            implicit: true,
        }
    }

    /// Offset of the declaring node, if there is one.
    pub fn declared_at(&self) -> Option<u64> {
        self.declaration.map(|d| d.span.start)
    }
}

// ============================================================================
// Scope
// ============================================================================

/// One lexical region.
#[derive(Debug, Clone)]
pub struct Scope {
    /// `(<Variant>) <start>:<end>`, or `root`.
    pub key: String,
    /// Display name; the key unless a function or method name replaced it.
    pub name: String,
    /// Variant tag of the owning node; `None` for the root.
    pub kind: Option<String>,
    pub node: Option<NodeId>,
    pub span: Option<Span>,
    pub variables: BTreeMap<String, VariableTracker>,
    pub children: Vec<ScopeId>,
    pub parent: Option<ScopeId>,
}

impl Scope {
    fn root() -> Self {
        Scope {
            key: ROOT_SCOPE_KEY.to_string(),
            name: ROOT_SCOPE_KEY.to_string(),
            kind: None,
            node: None,
            span: None,
            variables: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn variable(&self, name: &str) -> Option<&VariableTracker> {
        self.variables.get(name)
    }

    pub fn start(&self) -> Option<u64> {
        self.span.map(|s| s.start)
    }
}

// ============================================================================
// Scope Tree
// ============================================================================

/// Arena of scopes plus the traversal cursor.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// A tree holding only the root sentinel, which is current.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::root()],
            current: ScopeId(0),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn current_scope(&self) -> &Scope {
        &self[self.current]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Open a scope owned by `node` as a child of the current scope and make
    /// it current.
    pub fn push_scope(&mut self, node: &Node, display_name: Option<&str>) -> ScopeId {
        let key = format!("({}) {}:{}", node.type_name(), node.start(), node.end());
        let id = ScopeId(self.scopes.len() as u32);
        let parent = self.current;
        tracing::debug!(scope = %key, parent = %self[parent].key, "push scope");
        self.scopes.push(Scope {
            name: display_name
                .filter(|name| !name.is_empty())
                .map_or_else(|| key.clone(), str::to_string),
            key,
            kind: Some(node.type_name().to_string()),
            node: Some(node.id),
            span: Some(node.span),
            variables: BTreeMap::new(),
            children: Vec::new(),
            parent: Some(parent),
        });
        self.scopes[parent.index()].children.push(id);
        self.current = id;
        id
    }

    /// Move the cursor to the parent of the current scope.
    pub fn pop_scope(&mut self) -> Result<ScopeId, ScopeError> {
        let scope = &self[self.current];
        let parent = scope.parent.ok_or(ScopeError::PopRoot)?;
        tracing::debug!(scope = %scope.key, "pop scope");
        self.current = parent;
        Ok(parent)
    }

    /// Declare `name` directly in the current scope.
    ///
    /// Shadowing a name from an enclosing scope is fine; declaring a name the
    /// current scope already holds is not, even if that entry was implicit.
    pub fn register_declaration(
        &mut self,
        name: &str,
        declaration: Declaration,
    ) -> Result<&mut VariableTracker, ScopeError> {
        let current = self.current.index();
        let variables = &mut self.scopes[current].variables;
        if variables.contains_key(name) {
            return Err(ScopeError::DuplicateDeclaration {
                name: name.to_string(),
                offset: declaration.span.start,
            });
        }
        Ok(variables
            .entry(name.to_string())
            .or_insert_with(|| VariableTracker::declared(name, declaration)))
    }

    /// Record that `property` was read or written through `object`.
    pub fn record_access(
        &mut self,
        object: &str,
        property: &str,
        offset: u64,
        sink: &mut dyn DiagnosticSink,
    ) {
        let warning = || {
            Diagnostic::warning(
                "implicit_access",
                format!("Accessing uninitialized variable {} at position {}", object, offset),
            )
            .at(offset)
        };
        let tracker = self.tracker_or_implicit(object, warning, sink);
        tracker.accesses.insert(property.to_string());
    }

    /// Append `value` to the assignment history of `name`.
    pub fn record_assignment(
        &mut self,
        name: &str,
        value: &str,
        offset: u64,
        sink: &mut dyn DiagnosticSink,
    ) {
        let warning = || {
            Diagnostic::warning(
                "implicit_assignment",
                format!("Assigning uninitialized variable {} at position {}", name, offset),
            )
            .at(offset)
        };
        let tracker = self.tracker_or_implicit(name, warning, sink);
        tracker.assignments.push(value.to_string());
    }

    /// Innermost scope, from the current one outwards, that holds `name`.
    pub fn lookup(&self, name: &str) -> Option<ScopeId> {
        let mut cursor = Some(self.current);
        while let Some(id) = cursor {
            let scope = &self[id];
            if scope.variables.contains_key(name) {
                return Some(id);
            }
            cursor = scope.parent;
        }
        None
    }

    fn tracker_or_implicit(
        &mut self,
        name: &str,
        warning: impl FnOnce() -> Diagnostic,
        sink: &mut dyn DiagnosticSink,
    ) -> &mut VariableTracker {
        let owner = match self.lookup(name) {
            Some(owner) => owner,
            None => {
                sink.record(warning());
                self.current
            }
        };
        self.scopes[owner.index()]
            .variables
            .entry(name.to_string())
            .or_insert_with(|| VariableTracker::implicit(name))
    }

    /// All scopes in pre-order from the root.
    pub fn flatten(&self) -> Vec<ScopeId> {
        let mut out = Vec::with_capacity(self.scopes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self[id].children.iter().rev());
        }
        out
    }

    /// Scopes whose display name is `name`.
    pub fn scopes_named<'t>(&'t self, name: &'t str) -> impl Iterator<Item = &'t Scope> + 't {
        self.scopes.iter().filter(move |s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, s)| (ScopeId(i as u32), s))
    }
}

impl Index<ScopeId> for ScopeTree {
    type Output = Scope;

    fn index(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shapefinder_ast::Ast;
    use shapefinder_core::diagnostics::{CollectingSink, Severity};

    /// `{ { } }` as two nested block statements.
    fn blocks() -> Ast {
        let tree = serde_json::json!({
            "type": "BlockStatement", "start": 0, "end": 7,
            "body": [{"type": "BlockStatement", "start": 2, "end": 5, "body": []}]
        });
        Ast::from_estree_value("{ { } }", &tree).unwrap()
    }

    fn decl(start: u64) -> Declaration {
        Declaration {
            node: NodeId(0),
            span: Span::new(start, start + 1),
        }
    }

    mod cursor_tests {
        use super::*;

        #[test]
        fn push_links_parent_and_child() {
            let ast = blocks();
            let mut tree = ScopeTree::new();
            let outer = tree.push_scope(&ast[NodeId(0)], None);
            let inner = tree.push_scope(&ast[NodeId(1)], Some("inner"));

            assert_eq!(tree[outer].key, "(BlockStatement) 0:7");
            assert_eq!(tree[outer].name, "(BlockStatement) 0:7");
            assert_eq!(tree[inner].name, "inner");
            assert_eq!(tree[inner].parent, Some(outer));
            assert_eq!(tree[outer].children, vec![inner]);
            assert_eq!(tree[tree.root()].children, vec![outer]);
            assert_eq!(tree.current(), inner);
        }

        #[test]
        fn pop_returns_to_parent_and_keeps_scopes() {
            let ast = blocks();
            let mut tree = ScopeTree::new();
            let outer = tree.push_scope(&ast[NodeId(0)], None);
            tree.push_scope(&ast[NodeId(1)], None);
            assert_eq!(tree.pop_scope(), Ok(outer));
            assert_eq!(tree.pop_scope(), Ok(tree.root()));
            assert_eq!(tree.len(), 3);
            assert_eq!(tree.flatten().len(), 3);
        }

        #[test]
        fn popping_root_is_an_error() {
            let mut tree = ScopeTree::new();
            assert_eq!(tree.pop_scope(), Err(ScopeError::PopRoot));
        }

        #[test]
        fn empty_display_name_falls_back_to_key() {
            let ast = blocks();
            let mut tree = ScopeTree::new();
            let id = tree.push_scope(&ast[NodeId(0)], Some(""));
            assert_eq!(tree[id].name, tree[id].key);
        }
    }

    mod declaration_tests {
        use super::*;

        #[test]
        fn duplicate_in_same_scope_fails() {
            let mut tree = ScopeTree::new();
            tree.register_declaration("a", decl(4)).unwrap();
            let err = tree.register_declaration("a", decl(15)).unwrap_err();
            assert_eq!(
                err,
                ScopeError::DuplicateDeclaration {
                    name: "a".to_string(),
                    offset: 15
                }
            );
            assert_eq!(err.offset(), Some(15));
        }

        #[test]
        fn shadowing_in_child_scope_is_allowed() {
            let ast = blocks();
            let mut tree = ScopeTree::new();
            tree.push_scope(&ast[NodeId(0)], None);
            tree.register_declaration("a", decl(1)).unwrap();
            let inner = tree.push_scope(&ast[NodeId(1)], None);
            tree.register_declaration("a", decl(3)).unwrap();
            assert_eq!(tree.lookup("a"), Some(inner));
        }

        #[test]
        fn implicit_then_declared_conflicts() {
            let mut tree = ScopeTree::new();
            let mut sink = CollectingSink::new();
            tree.record_assignment("x", "1", 0, &mut sink);
            assert!(tree.register_declaration("x", decl(9)).is_err());
        }
    }

    mod usage_tests {
        use super::*;

        #[test]
        fn access_resolves_through_ancestors() {
            let ast = blocks();
            let mut tree = ScopeTree::new();
            let outer = tree.push_scope(&ast[NodeId(0)], None);
            tree.register_declaration("obj", decl(0)).unwrap();
            tree.push_scope(&ast[NodeId(1)], None);

            let mut sink = CollectingSink::new();
            tree.record_access("obj", "x", 3, &mut sink);
            tree.record_access("obj", "x", 4, &mut sink);
            tree.record_access("obj", "y", 5, &mut sink);

            let obj = tree[outer].variable("obj").unwrap();
            assert_eq!(obj.accesses.iter().collect::<Vec<_>>(), vec!["x", "y"]);
            assert!(sink.diagnostics().is_empty());
        }

        #[test]
        fn undeclared_access_is_synthesized_with_warning() {
            let ast = blocks();
            let mut tree = ScopeTree::new();
            tree.push_scope(&ast[NodeId(0)], None);
            let inner = tree.push_scope(&ast[NodeId(1)], None);

            let mut sink = CollectingSink::new();
            tree.record_access("console", "log", 3, &mut sink);

            let tracker = tree[inner].variable("console").unwrap();
            assert!(tracker.implicit);
            assert_eq!(tracker.declared_at(), None);
            assert!(tracker.accesses.contains("log"));

            let warnings: Vec<_> = sink.warnings().collect();
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].severity, Severity::Warning);
            assert_eq!(
                warnings[0].message,
                "Accessing uninitialized variable console at position 3"
            );
            assert_eq!(warnings[0].offset, Some(3));
        }

        #[test]
        fn second_undeclared_use_warns_once() {
            let mut tree = ScopeTree::new();
            let mut sink = CollectingSink::new();
            tree.record_assignment("total", "0", 0, &mut sink);
            tree.record_assignment("total", "1", 10, &mut sink);
            let tracker = tree[tree.root()].variable("total").unwrap();
            assert_eq!(tracker.assignments, vec!["0", "1"]);
            assert_eq!(sink.diagnostics().len(), 1);
            assert_eq!(sink.diagnostics()[0].code, "implicit_assignment");
        }

        #[test]
        fn assignment_history_is_append_only() {
            let mut tree = ScopeTree::new();
            let mut sink = CollectingSink::new();
            tree.register_declaration("n", decl(0)).unwrap();
            for value in ["1", "2", "1"] {
                tree.record_assignment("n", value, 0, &mut sink);
            }
            assert_eq!(
                tree[tree.root()].variable("n").unwrap().assignments,
                vec!["1", "2", "1"]
            );
        }
    }

    #[test]
    fn flatten_is_preorder() {
        // {a} {b} around a nested {c}: root -> [A -> [C], B]
        let tree_json = serde_json::json!({
            "type": "Program", "start": 0, "end": 12,
            "body": [
                {"type": "BlockStatement", "start": 0, "end": 7,
                 "body": [{"type": "BlockStatement", "start": 2, "end": 5, "body": []}]},
                {"type": "BlockStatement", "start": 8, "end": 12, "body": []}
            ]
        });
        let ast = Ast::from_estree_value("{ { } } {  }", &tree_json).unwrap();
        let mut tree = ScopeTree::new();
        let a = tree.push_scope(&ast[NodeId(1)], Some("A"));
        let c = tree.push_scope(&ast[NodeId(2)], Some("C"));
        tree.pop_scope().unwrap();
        tree.pop_scope().unwrap();
        let b = tree.push_scope(&ast[NodeId(3)], Some("B"));
        assert_eq!(tree.flatten(), vec![tree.root(), a, c, b]);
        assert_eq!(tree.scopes_named("C").count(), 1);
    }
}
