// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression payloads.

use super::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
}

/// A literal value.
///
/// The canonical text of a literal is its source slice; `raw` is kept as a
/// fallback for trees whose spans do not address the source buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub raw: Option<String>,
    /// The decoded value as the producer reported it.
    pub value: serde_json::Value,
}

/// `object.property` or `object[property]`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: NodeId,
    pub property: NodeId,
    pub computed: bool,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: NodeId,
    pub arguments: Vec<NodeId>,
    pub optional: bool,
}

/// `left OP right` where OP is `=`, `+=`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub operator: String,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: String,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    pub id: Option<NodeId>,
    pub params: Vec<NodeId>,
    pub body: NodeId,
    pub is_async: bool,
    pub generator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunctionExpression {
    pub params: Vec<NodeId>,
    /// A block statement, or the returned expression when `expression` is set.
    pub body: NodeId,
    pub expression: bool,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    /// `Property` and `SpreadElement` nodes.
    pub properties: Vec<NodeId>,
}

/// One entry of an object literal or object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: NodeId,
    pub value: NodeId,
    pub computed: bool,
    /// `init`, `get` or `set`.
    pub kind: String,
    pub method: bool,
    pub shorthand: bool,
}
