// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The [`Ast`] arena: source text, nodes, and the parent table.

use std::ops::Index;

use crate::nodes::{Node, NodeId};
use crate::offsets::SourceIndex;
use crate::parents::{ParentTable, TreeFormatter};

/// Remaining stack below which recursive passes switch to a fresh segment.
const STACK_RED_ZONE: usize = 32 * 1024;
/// Size of each stack segment allocated for deep trees.
const STACK_SEGMENT: usize = 1024 * 1024;

/// Run one level of a recursive tree pass, growing the stack when deep
/// nesting has used most of it.
pub(crate) fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, f)
}

/// A loaded syntax tree together with the source it was parsed from.
///
/// Nodes are immutable once the tree is built. Parent links are computed
/// exactly once, during construction, before any caller can walk the tree.
///
/// Node spans are producer offsets; [`Ast::text`] translates them before
/// slicing the source.
#[derive(Debug, Clone)]
pub struct Ast {
    source: String,
    offsets: SourceIndex,
    nodes: Vec<Node>,
    root: NodeId,
    parents: ParentTable,
}

impl Ast {
    /// Build a tree from pre-order nodes whose ids equal their positions.
    pub(crate) fn from_nodes(source: String, nodes: Vec<Node>) -> Self {
        let mut ast = Ast {
            offsets: SourceIndex::new(&source),
            source,
            nodes,
            root: NodeId(0),
            parents: ParentTable::default(),
        };
        ast.parents = TreeFormatter::format(&ast);
        ast
    }

    /// The source text the tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self[self.root]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn parents(&self) -> &ParentTable {
        &self.parents
    }

    /// Parent of `id`; `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.parent_of(id)
    }

    pub fn parent_node(&self, id: NodeId) -> Option<&Node> {
        self.parent(id).and_then(|p| self.get(p))
    }

    /// Source text covered by a node, if its span addresses the buffer.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        let span = self.offsets.byte_span(self.get(id)?.span)?;
        span.slice(&self.source)
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
