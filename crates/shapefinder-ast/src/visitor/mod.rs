// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for tree traversal.
//!
//! The design follows a hybrid approach: macro-generated trait method
//! signatures with one exhaustive dispatch in the walker.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in field order, which for ESTree is source order
//!
//! # Visitor Pattern
//!
//! ```ignore
//! use shapefinder_ast::{walk_ast, Node, VisitResult, Visitor};
//!
//! struct NodeCounter {
//!     count: usize,
//! }
//!
//! impl<'a> Visitor<'a> for NodeCounter {
//!     fn pre_visit(&mut self, _node: &'a Node) {
//!         self.count += 1;
//!     }
//! }
//!
//! let mut counter = NodeCounter { count: 0 };
//! walk_ast(&mut counter, &ast);
//! ```

mod dispatch;
mod traits;
mod value;

pub use dispatch::{walk_ast, walk_node};
pub use traits::{VisitResult, Visitor};
pub use value::{resolve, try_resolve, ValueResolver};
