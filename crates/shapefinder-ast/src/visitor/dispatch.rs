// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for tree traversal.
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Field order**: children are visited in [`NodeKind::children`] order
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no further hooks)

use super::traits::{VisitResult, Visitor};
use crate::nodes::{Node, NodeId, NodeKind};
use crate::tree::{with_stack, Ast};

/// Walk the whole tree from its root.
pub fn walk_ast<'a, V: Visitor<'a>>(visitor: &mut V, ast: &'a Ast) -> VisitResult {
    walk_node(visitor, ast, ast.root())
}

/// Walk the subtree rooted at `id`.
///
/// Returns `Stop` if any hook stopped the traversal, `Continue` otherwise.
/// Ids that do not belong to `ast` are ignored.
pub fn walk_node<'a, V: Visitor<'a>>(visitor: &mut V, ast: &'a Ast, id: NodeId) -> VisitResult {
    with_stack(|| walk_subtree(visitor, ast, id))
}

fn walk_subtree<'a, V: Visitor<'a>>(visitor: &mut V, ast: &'a Ast, id: NodeId) -> VisitResult {
    let Some(node) = ast.get(id) else {
        return VisitResult::Continue;
    };

    visitor.pre_visit(node);
    let result = begin(visitor, node);
    visitor.post_visit(node);

    match result {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for child in node.kind.children() {
                if walk_node(visitor, ast, child) == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
    }

    visitor.pre_leave(node);
    let result = end(visitor, node);
    visitor.post_leave(node);

    if result == VisitResult::Stop {
        VisitResult::Stop
    } else {
        VisitResult::Continue
    }
}

fn begin<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Node) -> VisitResult {
    match &node.kind {
        NodeKind::Program(n) => visitor.visit_program(node, n),
        NodeKind::VariableDeclaration(n) => visitor.visit_variable_declaration(node, n),
        NodeKind::VariableDeclarator(n) => visitor.visit_variable_declarator(node, n),
        NodeKind::Identifier(n) => visitor.visit_identifier(node, n),
        NodeKind::Literal(n) => visitor.visit_literal(node, n),
        NodeKind::MemberExpression(n) => visitor.visit_member_expression(node, n),
        NodeKind::CallExpression(n) => visitor.visit_call_expression(node, n),
        NodeKind::AssignmentExpression(n) => visitor.visit_assignment_expression(node, n),
        NodeKind::BinaryExpression(n) => visitor.visit_binary_expression(node, n),
        NodeKind::FunctionDeclaration(n) => visitor.visit_function_declaration(node, n),
        NodeKind::FunctionExpression(n) => visitor.visit_function_expression(node, n),
        NodeKind::ArrowFunctionExpression(n) => visitor.visit_arrow_function_expression(node, n),
        NodeKind::BlockStatement(n) => visitor.visit_block_statement(node, n),
        NodeKind::ForStatement(n) => visitor.visit_for_statement(node, n),
        NodeKind::ForOfStatement(n) => visitor.visit_for_of_statement(node, n),
        NodeKind::ForInStatement(n) => visitor.visit_for_in_statement(node, n),
        NodeKind::ObjectExpression(n) => visitor.visit_object_expression(node, n),
        NodeKind::Property(n) => visitor.visit_property(node, n),
        NodeKind::Other(n) => visitor.visit_other(node, n),
    }
}

fn end<'a, V: Visitor<'a>>(visitor: &mut V, node: &'a Node) -> VisitResult {
    match &node.kind {
        NodeKind::Program(n) => visitor.leave_program(node, n),
        NodeKind::VariableDeclaration(n) => visitor.leave_variable_declaration(node, n),
        NodeKind::VariableDeclarator(n) => visitor.leave_variable_declarator(node, n),
        NodeKind::Identifier(n) => visitor.leave_identifier(node, n),
        NodeKind::Literal(n) => visitor.leave_literal(node, n),
        NodeKind::MemberExpression(n) => visitor.leave_member_expression(node, n),
        NodeKind::CallExpression(n) => visitor.leave_call_expression(node, n),
        NodeKind::AssignmentExpression(n) => visitor.leave_assignment_expression(node, n),
        NodeKind::BinaryExpression(n) => visitor.leave_binary_expression(node, n),
        NodeKind::FunctionDeclaration(n) => visitor.leave_function_declaration(node, n),
        NodeKind::FunctionExpression(n) => visitor.leave_function_expression(node, n),
        NodeKind::ArrowFunctionExpression(n) => visitor.leave_arrow_function_expression(node, n),
        NodeKind::BlockStatement(n) => visitor.leave_block_statement(node, n),
        NodeKind::ForStatement(n) => visitor.leave_for_statement(node, n),
        NodeKind::ForOfStatement(n) => visitor.leave_for_of_statement(node, n),
        NodeKind::ForInStatement(n) => visitor.leave_for_in_statement(node, n),
        NodeKind::ObjectExpression(n) => visitor.leave_object_expression(node, n),
        NodeKind::Property(n) => visitor.leave_property(node, n),
        NodeKind::Other(n) => visitor.leave_other(node, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Identifier, MemberExpression, OtherNode};
    use serde_json::json;

    /// `a.b(c);`
    fn call_tree() -> Ast {
        let tree = json!({
            "type": "Program", "start": 0, "end": 7, "sourceType": "script",
            "body": [{
                "type": "ExpressionStatement", "start": 0, "end": 7,
                "expression": {
                    "type": "CallExpression", "start": 0, "end": 6, "optional": false,
                    "callee": {
                        "type": "MemberExpression", "start": 0, "end": 3,
                        "object": {"type": "Identifier", "start": 0, "end": 1, "name": "a"},
                        "property": {"type": "Identifier", "start": 2, "end": 3, "name": "b"},
                        "computed": false, "optional": false
                    },
                    "arguments": [{"type": "Identifier", "start": 4, "end": 5, "name": "c"}]
                }
            }]
        });
        Ast::from_estree_value("a.b(c);".to_string(), &tree).unwrap()
    }

    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
        skip_members: bool,
        stop_at: Option<&'static str>,
    }

    impl<'a> Visitor<'a> for EventLog {
        fn pre_visit(&mut self, node: &'a Node) {
            self.events.push(format!("pre_visit {}", node.type_name()));
        }

        fn post_visit(&mut self, node: &'a Node) {
            self.events.push(format!("post_visit {}", node.type_name()));
        }

        fn pre_leave(&mut self, node: &'a Node) {
            self.events.push(format!("pre_leave {}", node.type_name()));
        }

        fn post_leave(&mut self, node: &'a Node) {
            self.events.push(format!("post_leave {}", node.type_name()));
        }

        fn visit_identifier(&mut self, _node: &'a Node, data: &'a Identifier) -> VisitResult {
            self.events.push(format!("visit {}", data.name));
            if self.stop_at == Some(data.name.as_str()) {
                return VisitResult::Stop;
            }
            VisitResult::Continue
        }

        fn visit_member_expression(
            &mut self,
            _node: &'a Node,
            _data: &'a MemberExpression,
        ) -> VisitResult {
            if self.skip_members {
                VisitResult::SkipChildren
            } else {
                VisitResult::Continue
            }
        }

        fn visit_other(&mut self, _node: &'a Node, data: &'a OtherNode) -> VisitResult {
            self.events.push(format!("visit other {}", data.type_name));
            VisitResult::Continue
        }
    }

    fn visited_names(log: &EventLog) -> Vec<&str> {
        log.events
            .iter()
            .filter_map(|e| e.strip_prefix("visit "))
            .filter(|e| !e.starts_with("other"))
            .collect()
    }

    #[test]
    fn test_children_in_field_order() {
        let ast = call_tree();
        let mut log = EventLog::default();
        assert_eq!(walk_ast(&mut log, &ast), VisitResult::Continue);
        assert_eq!(visited_names(&log), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_hook_order_for_leaf() {
        let ast = call_tree();
        let mut log = EventLog::default();
        let leaf = ast
            .iter()
            .find(|n| matches!(&n.kind, NodeKind::Identifier(i) if i.name == "c"))
            .unwrap();
        walk_node(&mut log, &ast, leaf.id);
        assert_eq!(
            log.events,
            vec![
                "pre_visit Identifier",
                "visit c",
                "post_visit Identifier",
                "pre_leave Identifier",
                "post_leave Identifier",
            ]
        );
    }

    #[test]
    fn test_post_hooks_run_for_every_variant() {
        let ast = call_tree();
        let mut log = EventLog::default();
        walk_ast(&mut log, &ast);
        let post_visits = log
            .events
            .iter()
            .filter(|e| e.starts_with("post_visit"))
            .count();
        let post_leaves = log
            .events
            .iter()
            .filter(|e| e.starts_with("post_leave"))
            .count();
        assert_eq!(post_visits, ast.len());
        assert_eq!(post_leaves, ast.len());
    }

    #[test]
    fn test_other_variant_is_visited_and_descended() {
        let ast = call_tree();
        let mut log = EventLog::default();
        walk_ast(&mut log, &ast);
        assert!(log
            .events
            .contains(&"visit other ExpressionStatement".to_string()));
        assert!(visited_names(&log).contains(&"c"));
    }

    #[test]
    fn test_skip_children_still_leaves() {
        let ast = call_tree();
        let mut log = EventLog {
            skip_members: true,
            ..EventLog::default()
        };
        walk_ast(&mut log, &ast);
        assert_eq!(visited_names(&log), vec!["c"]);
        assert!(log
            .events
            .contains(&"post_leave MemberExpression".to_string()));
    }

    #[test]
    fn test_stop_halts_everything() {
        let ast = call_tree();
        let mut log = EventLog {
            stop_at: Some("b"),
            ..EventLog::default()
        };
        assert_eq!(walk_ast(&mut log, &ast), VisitResult::Stop);
        assert_eq!(visited_names(&log), vec!["a", "b"]);
        assert!(!log.events.iter().any(|e| e.starts_with("pre_leave Program")));
        // post_visit still runs for the node whose visit hook stopped.
        assert_eq!(log.events.last().map(String::as_str), Some("post_visit Identifier"));
    }

    #[test]
    fn test_foreign_id_is_ignored() {
        let ast = call_tree();
        let mut log = EventLog::default();
        assert_eq!(
            walk_node(&mut log, &ast, NodeId(10_000)),
            VisitResult::Continue
        );
        assert!(log.events.is_empty());
    }
}
