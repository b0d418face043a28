// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Canonical-value resolver.
//!
//! [`ValueResolver`] renders an expression subtree back into one normalized
//! string. The first matching rule wins and the resolver never descends past
//! the node it resolved:
//!
//! | Variant | Rendering |
//! |---------|-----------|
//! | `Literal` | source text exactly as written |
//! | `Identifier` | its name |
//! | `MemberExpression` | `obj.prop`, or `obj[prop]` when computed |
//! | `CallExpression` | `callee(arg1, arg2)` |
//! | `AssignmentExpression`, `BinaryExpression` | `left OP right` |
//!
//! Every other variant is unresolved. Sub-expressions are resolved by fresh
//! resolvers, so an unresolved operand renders as an empty string inside the
//! enclosing form.

use super::dispatch::walk_node;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{
    ArrowFunctionExpression, AssignmentExpression, BinaryExpression, BlockStatement,
    CallExpression, ForInStatement, ForOfStatement, ForStatement, FunctionDeclaration,
    FunctionExpression, Identifier, Literal, MemberExpression, Node, NodeId, ObjectExpression,
    OtherNode, Program, Property, VariableDeclaration, VariableDeclarator,
};
use crate::tree::Ast;

/// Resolve `id` to its canonical string, or `""` if no rule applies.
pub fn resolve(ast: &Ast, id: NodeId) -> String {
    try_resolve(ast, id).unwrap_or_default()
}

/// Resolve `id` to its canonical string, or `None` if no rule applies.
pub fn try_resolve(ast: &Ast, id: NodeId) -> Option<String> {
    let mut resolver = ValueResolver::new(ast);
    resolver.resolve_node(id);
    resolver.value
}

/// Visitor that computes the canonical value of the first node it visits.
///
/// A resolver holds the result of one resolution. Call [`reset`](Self::reset)
/// before reusing it, or use a fresh resolver per resolution.
#[derive(Debug)]
pub struct ValueResolver<'a> {
    ast: &'a Ast,
    value: Option<String>,
}

impl<'a> ValueResolver<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        ValueResolver { ast, value: None }
    }

    /// Walk `id` and return the resolved value.
    pub fn resolve_node(&mut self, id: NodeId) -> Option<&str> {
        let ast = self.ast;
        walk_node(self, ast, id);
        self.value()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Clear the current result.
    pub fn reset(&mut self) {
        self.value = None;
    }

    fn binary(&mut self, left: NodeId, operator: &str, right: NodeId) -> VisitResult {
        let left = resolve(self.ast, left);
        let right = resolve(self.ast, right);
        self.value = Some(format!("{} {} {}", left, operator, right));
        VisitResult::SkipChildren
    }
}

/// Variants with no rendering rule: leave the value unset and stop there.
macro_rules! unresolved {
    ($($method:ident: $node_type:ty),* $(,)?) => {
        $(
            fn $method(&mut self, _node: &'a Node, _data: &'a $node_type) -> VisitResult {
                VisitResult::SkipChildren
            }
        )*
    };
}

impl<'a> Visitor<'a> for ValueResolver<'a> {
    fn visit_literal(&mut self, node: &'a Node, data: &'a Literal) -> VisitResult {
        let text = self
            .ast
            .text(node.id)
            .map(str::to_string)
            .or_else(|| data.raw.clone())
            .unwrap_or_else(|| data.value.to_string());
        self.value = Some(text);
        VisitResult::SkipChildren
    }

    fn visit_identifier(&mut self, _node: &'a Node, data: &'a Identifier) -> VisitResult {
        self.value = Some(data.name.clone());
        VisitResult::SkipChildren
    }

    fn visit_member_expression(
        &mut self,
        _node: &'a Node,
        data: &'a MemberExpression,
    ) -> VisitResult {
        let object = resolve(self.ast, data.object);
        let property = resolve(self.ast, data.property);
        self.value = Some(if data.computed {
            format!("{}[{}]", object, property)
        } else {
            format!("{}.{}", object, property)
        });
        VisitResult::SkipChildren
    }

    fn visit_call_expression(&mut self, _node: &'a Node, data: &'a CallExpression) -> VisitResult {
        let callee = resolve(self.ast, data.callee);
        let args: Vec<String> = data
            .arguments
            .iter()
            .map(|arg| resolve(self.ast, *arg))
            .collect();
        self.value = Some(format!("{}({})", callee, args.join(", ")));
        VisitResult::SkipChildren
    }

    fn visit_assignment_expression(
        &mut self,
        _node: &'a Node,
        data: &'a AssignmentExpression,
    ) -> VisitResult {
        self.binary(data.left, &data.operator, data.right)
    }

    fn visit_binary_expression(
        &mut self,
        _node: &'a Node,
        data: &'a BinaryExpression,
    ) -> VisitResult {
        self.binary(data.left, &data.operator, data.right)
    }

    unresolved! {
        visit_program: Program,
        visit_variable_declaration: VariableDeclaration,
        visit_variable_declarator: VariableDeclarator,
        visit_function_declaration: FunctionDeclaration,
        visit_block_statement: BlockStatement,
        visit_for_statement: ForStatement,
        visit_for_of_statement: ForOfStatement,
        visit_for_in_statement: ForInStatement,
        visit_function_expression: FunctionExpression,
        visit_arrow_function_expression: ArrowFunctionExpression,
        visit_object_expression: ObjectExpression,
        visit_property: Property,
        visit_other: OtherNode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ident(name: &str, start: u64) -> serde_json::Value {
        json!({"type": "Identifier", "start": start, "end": start + name.len() as u64, "name": name})
    }

    /// Wrap one expression statement spanning the whole source.
    fn expr_ast(source: &str, expression: serde_json::Value) -> Ast {
        let len = source.len() as u64;
        let tree = json!({
            "type": "Program", "start": 0, "end": len, "sourceType": "script",
            "body": [{"type": "ExpressionStatement", "start": 0, "end": len, "expression": expression}]
        });
        Ast::from_estree_value(source.to_string(), &tree).unwrap()
    }

    /// Id of the expression under the single statement.
    const EXPR: NodeId = NodeId(2);

    #[test]
    fn literal_uses_source_text_verbatim() {
        let ast = expr_ast(
            "\"hi\"",
            json!({"type": "Literal", "start": 0, "end": 4, "value": "hi", "raw": "\"hi\""}),
        );
        assert_eq!(resolve(&ast, EXPR), "\"hi\"");

        let ast = expr_ast(
            "0x10",
            json!({"type": "Literal", "start": 0, "end": 4, "value": 16, "raw": "0x10"}),
        );
        assert_eq!(resolve(&ast, EXPR), "0x10");
    }

    #[test]
    fn literal_after_non_ascii_text_uses_utf16_offsets() {
        // acorn counts "é" as one unit, so the literal sits at 13..17.
        let source = "// é\nlet s = \"ab\";";
        let tree = json!({
            "type": "Program", "start": 0, "end": 18, "sourceType": "script",
            "body": [{
                "type": "VariableDeclaration", "start": 5, "end": 18, "kind": "let",
                "declarations": [{
                    "type": "VariableDeclarator", "start": 9, "end": 17,
                    "id": ident("s", 9),
                    "init": {"type": "Literal", "start": 13, "end": 17, "value": "ab", "raw": "\"ab\""}
                }]
            }]
        });
        let ast = Ast::from_estree_value(source.to_string(), &tree).unwrap();
        let literal = ast
            .iter()
            .find(|n| n.type_name() == "Literal")
            .map(|n| n.id)
            .unwrap();
        assert_eq!(resolve(&ast, literal), "\"ab\"");
        assert_eq!(ast.text(ast.root()), Some(source));
    }

    #[test]
    fn literal_falls_back_to_raw_when_span_is_outside_source() {
        let ast = expr_ast(
            "",
            json!({"type": "Literal", "start": 0, "end": 4, "value": true, "raw": "true"}),
        );
        // Program span ends at 0 but the literal claims 0..4; the slice fails.
        assert_eq!(resolve(&ast, EXPR), "true");
    }

    #[test]
    fn member_expression_dot_and_computed() {
        let ast = expr_ast(
            "obj.prop",
            json!({
                "type": "MemberExpression", "start": 0, "end": 8, "computed": false, "optional": false,
                "object": ident("obj", 0), "property": ident("prop", 4)
            }),
        );
        assert_eq!(resolve(&ast, EXPR), "obj.prop");

        let ast = expr_ast(
            "obj[key]",
            json!({
                "type": "MemberExpression", "start": 0, "end": 8, "computed": true, "optional": false,
                "object": ident("obj", 0), "property": ident("key", 4)
            }),
        );
        assert_eq!(resolve(&ast, EXPR), "obj[key]");
    }

    #[test]
    fn call_expression_joins_arguments() {
        let ast = expr_ast(
            "f(a, 1)",
            json!({
                "type": "CallExpression", "start": 0, "end": 7, "optional": false,
                "callee": ident("f", 0),
                "arguments": [ident("a", 2), {"type": "Literal", "start": 5, "end": 6, "value": 1, "raw": "1"}]
            }),
        );
        assert_eq!(resolve(&ast, EXPR), "f(a, 1)");
    }

    #[test]
    fn call_expression_with_single_argument_object() {
        let ast = expr_ast(
            "g(x)",
            json!({
                "type": "CallExpression", "start": 0, "end": 4,
                "callee": ident("g", 0),
                "arguments": ident("x", 2)
            }),
        );
        assert_eq!(resolve(&ast, EXPR), "g(x)");
    }

    #[test]
    fn binary_and_assignment_use_operator() {
        let ast = expr_ast(
            "a + b",
            json!({
                "type": "BinaryExpression", "start": 0, "end": 5, "operator": "+",
                "left": ident("a", 0), "right": ident("b", 4)
            }),
        );
        assert_eq!(resolve(&ast, EXPR), "a + b");

        let ast = expr_ast(
            "x += y",
            json!({
                "type": "AssignmentExpression", "start": 0, "end": 6, "operator": "+=",
                "left": ident("x", 0), "right": ident("y", 5)
            }),
        );
        assert_eq!(resolve(&ast, EXPR), "x += y");
    }

    #[test]
    fn unresolved_variants_yield_nothing() {
        let ast = expr_ast(
            "({a})",
            json!({
                "type": "ObjectExpression", "start": 1, "end": 4,
                "properties": [{
                    "type": "Property", "start": 2, "end": 3, "method": false, "shorthand": true,
                    "computed": false, "kind": "init",
                    "key": ident("a", 2), "value": ident("a", 2)
                }]
            }),
        );
        assert_eq!(try_resolve(&ast, EXPR), None);
        assert_eq!(resolve(&ast, EXPR), "");
    }

    #[test]
    fn unresolved_operand_renders_empty() {
        // this.x
        let ast = expr_ast(
            "this.x",
            json!({
                "type": "MemberExpression", "start": 0, "end": 6, "computed": false, "optional": false,
                "object": {"type": "ThisExpression", "start": 0, "end": 4},
                "property": ident("x", 5)
            }),
        );
        assert_eq!(resolve(&ast, EXPR), ".x");
    }

    #[test]
    fn reset_clears_value() {
        let ast = expr_ast("q", ident("q", 0));
        let mut resolver = ValueResolver::new(&ast);
        assert_eq!(resolver.resolve_node(EXPR), Some("q"));
        resolver.reset();
        assert_eq!(resolver.value(), None);
    }

    #[test]
    fn resolution_is_independent_of_previous_result() {
        let ast = expr_ast("q", ident("q", 0));
        let mut resolver = ValueResolver::new(&ast);
        resolver.resolve_node(EXPR);
        resolver.reset();
        // The statement node has no rule.
        assert_eq!(resolver.resolve_node(NodeId(1)), None);
    }
}
