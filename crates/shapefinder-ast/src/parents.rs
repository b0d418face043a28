// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parent links for loaded trees.
//!
//! [`TreeFormatter`] is the first visitor to run on every tree. It keeps an
//! explicit stack of the nodes currently being visited: on entering a node
//! the top of the stack is recorded as its parent and the node is pushed;
//! on leaving it the stack is popped. The result is a [`ParentTable`] side
//! table so nodes themselves never carry back-references.

use std::collections::HashMap;

use crate::nodes::{Node, NodeId};
use crate::tree::Ast;
use crate::visitor::{walk_ast, Visitor};

/// Maps every non-root node to its parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentTable {
    parents: HashMap<NodeId, NodeId>,
}

impl ParentTable {
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Number of recorded links (node count minus one for a formatted tree).
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.parents.iter()
    }
}

/// Visitor that builds the [`ParentTable`].
#[derive(Debug, Default)]
pub struct TreeFormatter {
    stack: Vec<NodeId>,
    table: ParentTable,
}

impl TreeFormatter {
    /// Walk `ast` once and return its parent links.
    pub fn format(ast: &Ast) -> ParentTable {
        let mut formatter = TreeFormatter::default();
        walk_ast(&mut formatter, ast);
        formatter.table
    }
}

impl<'a> Visitor<'a> for TreeFormatter {
    fn pre_visit(&mut self, node: &'a Node) {
        if let Some(&parent) = self.stack.last() {
            let previous = self.table.parents.insert(node.id, parent);
            debug_assert!(previous.is_none(), "{} reached twice", node.id);
        }
        self.stack.push(node.id);
    }

    fn pre_leave(&mut self, _node: &'a Node) {
        self.stack.pop();
    }
}
