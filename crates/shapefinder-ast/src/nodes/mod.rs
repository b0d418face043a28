// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node model for ESTree syntax trees.
//!
//! Nodes live in an arena owned by [`Ast`](crate::Ast) and refer to their
//! children by [`NodeId`]. The recognized ESTree variants each get a typed
//! payload; everything else is kept as an [`OtherNode`] with a reflective
//! field list so traversal still reaches nodes nested inside it.
//!
//! ## NodeId
//!
//! NodeIds are assigned in pre-order while the tree is loaded (parent before
//! children, left to right), so the root is always `NodeId(0)`:
//!
//! ```text
//! Given code: x = 1
//!   NodeId(0) -> Program
//!   NodeId(1) -> ExpressionStatement (Other)
//!   NodeId(2) -> AssignmentExpression
//!   NodeId(3) -> Identifier "x"
//!   NodeId(4) -> Literal 1
//! ```

mod expression;
mod other;
mod statement;

pub use expression::{
    ArrowFunctionExpression, AssignmentExpression, BinaryExpression, CallExpression,
    FunctionExpression, Identifier, Literal, MemberExpression, ObjectExpression, Property,
};
pub use other::{Field, OtherNode};
pub use statement::{
    BlockStatement, ForInStatement, ForOfStatement, ForStatement, FunctionDeclaration, Program,
    VariableDeclaration, VariableDeclarator,
};

use shapefinder_core::Span;

// ============================================================================
// Node Identity
// ============================================================================

/// A stable, unique identifier for a node within one [`Ast`](crate::Ast).
///
/// NodeIds index the arena directly and key side tables such as the
/// [`ParentTable`](crate::ParentTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Position of the node in the arena.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

// ============================================================================
// Node
// ============================================================================

/// One node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Source span `[start, end)`.
    pub span: Span,
    pub kind: NodeKind,
}

impl Node {
    /// The ESTree `type` tag of this node.
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    pub fn start(&self) -> u64 {
        self.span.start
    }

    pub fn end(&self) -> u64 {
        self.span.end
    }
}

/// The closed set of node variants.
///
/// Variant order here has no meaning; child order is given by
/// [`NodeKind::children`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(Program),
    VariableDeclaration(VariableDeclaration),
    VariableDeclarator(VariableDeclarator),
    Identifier(Identifier),
    Literal(Literal),
    MemberExpression(MemberExpression),
    CallExpression(CallExpression),
    AssignmentExpression(AssignmentExpression),
    BinaryExpression(BinaryExpression),
    FunctionDeclaration(FunctionDeclaration),
    FunctionExpression(FunctionExpression),
    ArrowFunctionExpression(ArrowFunctionExpression),
    BlockStatement(BlockStatement),
    ForStatement(ForStatement),
    ForOfStatement(ForOfStatement),
    ForInStatement(ForInStatement),
    ObjectExpression(ObjectExpression),
    Property(Property),
    /// Any ESTree node without a dedicated variant.
    Other(OtherNode),
}

impl NodeKind {
    /// The ESTree `type` tag.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Program(_) => "Program",
            NodeKind::VariableDeclaration(_) => "VariableDeclaration",
            NodeKind::VariableDeclarator(_) => "VariableDeclarator",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::Literal(_) => "Literal",
            NodeKind::MemberExpression(_) => "MemberExpression",
            NodeKind::CallExpression(_) => "CallExpression",
            NodeKind::AssignmentExpression(_) => "AssignmentExpression",
            NodeKind::BinaryExpression(_) => "BinaryExpression",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            NodeKind::BlockStatement(_) => "BlockStatement",
            NodeKind::ForStatement(_) => "ForStatement",
            NodeKind::ForOfStatement(_) => "ForOfStatement",
            NodeKind::ForInStatement(_) => "ForInStatement",
            NodeKind::ObjectExpression(_) => "ObjectExpression",
            NodeKind::Property(_) => "Property",
            NodeKind::Other(other) => &other.type_name,
        }
    }

    /// True for functions, function expressions and arrows.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration(_)
                | NodeKind::FunctionExpression(_)
                | NodeKind::ArrowFunctionExpression(_)
        )
    }

    /// Parameter nodes of a function-like variant, empty otherwise.
    pub fn params(&self) -> &[NodeId] {
        match self {
            NodeKind::FunctionDeclaration(f) => &f.params,
            NodeKind::FunctionExpression(f) => &f.params,
            NodeKind::ArrowFunctionExpression(f) => &f.params,
            _ => &[],
        }
    }

    /// Body node of a function-like variant.
    pub fn function_body(&self) -> Option<NodeId> {
        match self {
            NodeKind::FunctionDeclaration(f) => Some(f.body),
            NodeKind::FunctionExpression(f) => Some(f.body),
            NodeKind::ArrowFunctionExpression(f) => Some(f.body),
            _ => None,
        }
    }

    /// Child nodes in field declaration order.
    ///
    /// This is the order traversal visits children in and the order the
    /// loader assigned their ids in.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::Program(n) => out.extend(&n.body),
            NodeKind::VariableDeclaration(n) => out.extend(&n.declarations),
            NodeKind::VariableDeclarator(n) => {
                out.push(n.id);
                out.extend(n.init);
            }
            NodeKind::Identifier(_) | NodeKind::Literal(_) => {}
            NodeKind::MemberExpression(n) => {
                out.push(n.object);
                out.push(n.property);
            }
            NodeKind::CallExpression(n) => {
                out.push(n.callee);
                out.extend(&n.arguments);
            }
            NodeKind::AssignmentExpression(n) => {
                out.push(n.left);
                out.push(n.right);
            }
            NodeKind::BinaryExpression(n) => {
                out.push(n.left);
                out.push(n.right);
            }
            NodeKind::FunctionDeclaration(n) => {
                out.extend(n.id);
                out.extend(&n.params);
                out.push(n.body);
            }
            NodeKind::FunctionExpression(n) => {
                out.extend(n.id);
                out.extend(&n.params);
                out.push(n.body);
            }
            NodeKind::ArrowFunctionExpression(n) => {
                out.extend(&n.params);
                out.push(n.body);
            }
            NodeKind::BlockStatement(n) => out.extend(&n.body),
            NodeKind::ForStatement(n) => {
                out.extend(n.init);
                out.extend(n.test);
                out.extend(n.update);
                out.push(n.body);
            }
            NodeKind::ForOfStatement(n) => {
                out.push(n.left);
                out.push(n.right);
                out.push(n.body);
            }
            NodeKind::ForInStatement(n) => {
                out.push(n.left);
                out.push(n.right);
                out.push(n.body);
            }
            NodeKind::ObjectExpression(n) => out.extend(&n.properties),
            NodeKind::Property(n) => {
                out.push(n.key);
                out.push(n.value);
            }
            NodeKind::Other(n) => {
                for (_, field) in &n.fields {
                    field.collect_nodes(&mut out);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "NodeId(7)");
        assert_eq!(NodeId(3).index(), 3);
    }

    #[test]
    fn test_children_order_for_function() {
        let kind = NodeKind::FunctionDeclaration(FunctionDeclaration {
            id: Some(NodeId(1)),
            params: vec![NodeId(2), NodeId(3)],
            body: NodeId(4),
            is_async: false,
            generator: false,
        });
        assert_eq!(
            kind.children(),
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]
        );
        assert!(kind.is_function_like());
        assert_eq!(kind.params(), &[NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_children_skip_absent_optionals() {
        let kind = NodeKind::ForStatement(ForStatement {
            init: None,
            test: Some(NodeId(2)),
            update: None,
            body: NodeId(3),
        });
        assert_eq!(kind.children(), vec![NodeId(2), NodeId(3)]);
        assert!(!kind.is_function_like());
    }

    #[test]
    fn test_other_type_name_is_verbatim() {
        let kind = NodeKind::Other(OtherNode {
            type_name: "ReturnStatement".to_string(),
            fields: vec![("argument".to_string(), Field::Node(NodeId(5)))],
        });
        assert_eq!(kind.type_name(), "ReturnStatement");
        assert_eq!(kind.children(), vec![NodeId(5)]);
    }
}
