// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Names bound by declaration targets and parameters.
//!
//! A declarator id or a function parameter is either a plain identifier or a
//! destructuring pattern. [`binding_names`] flattens any of them into the
//! list of names it introduces, in source order:
//!
//! ```text
//! a                  -> [a]
//! a = 1              -> [a]        (AssignmentPattern.left)
//! ...rest            -> [rest]     (RestElement.argument)
//! { a, b: c, ...d }  -> [a, c, d]  (ObjectPattern property values)
//! [x, , [y]]         -> [x, y]     (ArrayPattern elements)
//! ```

use crate::nodes::{NodeId, NodeKind};
use crate::tree::{with_stack, Ast};

/// One bound name and the identifier node that binds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub node: NodeId,
}

/// Every name bound by the pattern rooted at `id`.
pub fn binding_names(ast: &Ast, id: NodeId) -> Vec<Binding> {
    let mut out = Vec::new();
    collect(ast, id, &mut out);
    out
}

fn collect(ast: &Ast, id: NodeId, out: &mut Vec<Binding>) {
    with_stack(|| collect_node(ast, id, out));
}

fn collect_node(ast: &Ast, id: NodeId, out: &mut Vec<Binding>) {
    let Some(node) = ast.get(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Identifier(ident) => out.push(Binding {
            name: ident.name.clone(),
            node: id,
        }),
        // `{ key: value }` inside an ObjectPattern binds through its value.
        NodeKind::Property(prop) => collect(ast, prop.value, out),
        NodeKind::Other(other) => match other.type_name.as_str() {
            "AssignmentPattern" => {
                if let Some(left) = other.node_field("left") {
                    collect(ast, left, out);
                }
            }
            "RestElement" => {
                if let Some(argument) = other.node_field("argument") {
                    collect(ast, argument, out);
                }
            }
            "ObjectPattern" => {
                for property in other.node_list("properties") {
                    collect(ast, property, out);
                }
            }
            "ArrayPattern" => {
                for element in other.node_list("elements") {
                    collect(ast, element, out);
                }
            }
            _ => {}
        },
        _ => {}
    }
}
