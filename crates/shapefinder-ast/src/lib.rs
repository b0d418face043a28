// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! ESTree syntax trees and the traversal framework built on them.
//!
//! This crate does not parse JavaScript. It loads the JSON an ESTree
//! producer (acorn, espree, meriyah) emits for a source file and provides:
//!
//! - **Node arena**: [`Ast`] owns the source text and every [`Node`],
//!   addressed by pre-order [`NodeId`].
//! - **Parent links**: [`ParentTable`], built once by [`TreeFormatter`]
//!   while the tree is constructed.
//! - **Traversal**: the [`Visitor`] trait with per-variant `visit_*` and
//!   `leave_*` hooks, global pre/post hooks, and [`walk_ast`]/[`walk_node`].
//! - **Canonical values**: [`resolve`] renders an expression back to text.
//! - **Bindings**: [`binding_names`] flattens declaration patterns.
//! - **Offsets**: [`SourceIndex`] maps the producer's UTF-16 offsets onto
//!   the UTF-8 source.
//!
//! # Quick Start
//!
//! ```
//! use shapefinder_ast::{resolve, Ast};
//!
//! let source = "a + b";
//! let json = r#"{
//!     "type": "BinaryExpression", "start": 0, "end": 5, "operator": "+",
//!     "left": {"type": "Identifier", "start": 0, "end": 1, "name": "a"},
//!     "right": {"type": "Identifier", "start": 4, "end": 5, "name": "b"}
//! }"#;
//! let ast = Ast::from_estree_json(source, json).expect("valid tree");
//! assert_eq!(resolve(&ast, ast.root()), "a + b");
//! ```

pub mod bindings;
pub mod error;
pub mod estree;
pub mod nodes;
pub mod offsets;
pub mod parents;
pub mod tree;
pub mod visitor;

pub use bindings::{binding_names, Binding};
pub use error::AstError;
pub use estree::{is_estree_node, MAX_NESTING_DEPTH};
pub use nodes::*;
pub use offsets::SourceIndex;
pub use parents::{ParentTable, TreeFormatter};
pub use tree::Ast;
pub use visitor::{resolve, try_resolve, walk_ast, walk_node, ValueResolver, VisitResult, Visitor};

pub use shapefinder_core::Span;
