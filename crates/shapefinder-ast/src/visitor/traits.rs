// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for tree traversal.

use crate::nodes::{
    ArrowFunctionExpression, AssignmentExpression, BinaryExpression, BlockStatement,
    CallExpression, ForInStatement, ForOfStatement, ForStatement, FunctionDeclaration,
    FunctionExpression, Identifier, Literal, MemberExpression, Node, ObjectExpression, OtherNode,
    Program, Property, VariableDeclaration, VariableDeclarator,
};

/// Result of visiting a node - controls traversal behavior.
///
/// When a visitor method returns a `VisitResult`, it controls how the walker
/// proceeds with traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further hooks are called. The walk function returns immediately.
    Stop,
}

/// Macro to generate visitor trait method signatures.
///
/// This macro generates pairs of `visit_*` and `leave_*` methods whose
/// default implementations return `VisitResult::Continue`.
///
/// # Usage
///
/// ```ignore
/// visitor_methods! {
///     // Generates visit_identifier and leave_identifier for Identifier
///     identifier: Identifier,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &'a Node, data: &'a $node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited, even if `SkipChildren` was returned. Returning `Stop` halts the walk."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &'a Node, data: &'a $node_type) -> VisitResult {
                    VisitResult::Continue
                }
            )*
        }
    };
}

/// Immutable visitor for tree traversal.
///
/// Implement this trait to walk an [`Ast`](crate::Ast). Each variant has a
/// `visit_*`/`leave_*` pair receiving the node and its typed payload; the
/// four global hooks run around them for every node.
///
/// # Traversal Order
///
/// For each node:
/// 1. `pre_visit`, `visit_<variant>`, `post_visit`
/// 2. children in field order, if the visit returned `Continue`
/// 3. `pre_leave`, `leave_<variant>`, `post_leave`
///
/// # Example
///
/// ```ignore
/// use shapefinder_ast::{Identifier, Node, VisitResult, Visitor};
///
/// struct NameCollector {
///     names: Vec<String>,
/// }
///
/// impl<'a> Visitor<'a> for NameCollector {
///     fn visit_identifier(&mut self, _node: &'a Node, id: &'a Identifier) -> VisitResult {
///         self.names.push(id.name.clone());
///         VisitResult::Continue
///     }
/// }
/// ```
pub trait Visitor<'a> {
    /// Called before the variant-specific visit hook of every node.
    #[allow(unused_variables)]
    fn pre_visit(&mut self, node: &'a Node) {}

    /// Called after the variant-specific visit hook of every node.
    #[allow(unused_variables)]
    fn post_visit(&mut self, node: &'a Node) {}

    /// Called before the variant-specific leave hook of every node.
    #[allow(unused_variables)]
    fn pre_leave(&mut self, node: &'a Node) {}

    /// Called after the variant-specific leave hook of every node.
    #[allow(unused_variables)]
    fn post_leave(&mut self, node: &'a Node) {}

    // Statements
    visitor_methods! {
        program: Program,
        variable_declaration: VariableDeclaration,
        variable_declarator: VariableDeclarator,
        function_declaration: FunctionDeclaration,
        block_statement: BlockStatement,
        for_statement: ForStatement,
        for_of_statement: ForOfStatement,
        for_in_statement: ForInStatement,
    }

    // Expressions
    visitor_methods! {
        identifier: Identifier,
        literal: Literal,
        member_expression: MemberExpression,
        call_expression: CallExpression,
        assignment_expression: AssignmentExpression,
        binary_expression: BinaryExpression,
        function_expression: FunctionExpression,
        arrow_function_expression: ArrowFunctionExpression,
        object_expression: ObjectExpression,
        property: Property,
    }

    // Everything else
    visitor_methods! {
        other: OtherNode,
    }
}
