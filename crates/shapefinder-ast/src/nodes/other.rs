// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Reflective representation for ESTree variants without a dedicated payload.

use super::NodeId;

/// A node whose variant has no typed payload.
///
/// Fields keep the producer's order, which is also the order traversal
/// visits the nodes nested inside them.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherNode {
    /// The verbatim ESTree `type` tag.
    pub type_name: String,
    pub fields: Vec<(String, Field)>,
}

impl OtherNode {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    /// The node stored directly in field `name`, if any.
    pub fn node_field(&self, name: &str) -> Option<NodeId> {
        match self.field(name)? {
            Field::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// The nodes stored in list field `name`, skipping holes and scalars.
    pub fn node_list(&self, name: &str) -> Vec<NodeId> {
        match self.field(name) {
            Some(Field::List(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Field::Node(id) => Some(*id),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// One field value of an [`OtherNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A nested node.
    Node(NodeId),
    /// A JSON array, element by element.
    List(Vec<Field>),
    /// A JSON object that is not itself a node.
    Map(Vec<(String, Field)>),
    /// Anything else: strings, numbers, booleans, null.
    Scalar(serde_json::Value),
}

impl Field {
    /// Append every node reachable through this field, in order.
    pub fn collect_nodes(&self, out: &mut Vec<NodeId>) {
        match self {
            Field::Node(id) => out.push(*id),
            Field::List(items) => items.iter().for_each(|item| item.collect_nodes(out)),
            Field::Map(entries) => entries.iter().for_each(|(_, v)| v.collect_nodes(out)),
            Field::Scalar(_) => {}
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::Scalar(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}
