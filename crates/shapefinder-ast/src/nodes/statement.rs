// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement and declaration payloads.

use super::NodeId;

/// Root of every tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<NodeId>,
    /// `"script"` or `"module"` when the producer reports it.
    pub source_type: Option<String>,
}

/// `var`, `let` or `const` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub declarations: Vec<NodeId>,
    /// `var`, `let` or `const`.
    pub kind: String,
}

/// One `id = init` entry of a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// Binding target: an identifier or a destructuring pattern.
    pub id: NodeId,
    pub init: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// Absent only for `export default function () {}`.
    pub id: Option<NodeId>,
    pub params: Vec<NodeId>,
    pub body: NodeId,
    pub is_async: bool,
    pub generator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub body: Vec<NodeId>,
}

/// `for (init; test; update) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<NodeId>,
    pub test: Option<NodeId>,
    pub update: Option<NodeId>,
    pub body: NodeId,
}

/// `for (left of right) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStatement {
    pub left: NodeId,
    pub right: NodeId,
    pub body: NodeId,
    pub is_await: bool,
}

/// `for (left in right) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    pub left: NodeId,
    pub right: NodeId,
    pub body: NodeId,
}
