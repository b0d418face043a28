// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised while loading an ESTree document.

use shapefinder_core::error::ShapeError;
use thiserror::Error;

/// Error loading an ESTree JSON document into an [`Ast`](crate::Ast).
#[derive(Debug, Error)]
pub enum AstError {
    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value that must be a node is not an object with a string `type`.
    #[error("expected an ESTree node at {context}")]
    NotANode { context: String },

    /// A node carries neither `start`/`end` nor `range`.
    #[error("{node_type} node has no source span")]
    MissingSpan { node_type: String },

    /// A node's span is inverted or not made of integers.
    #[error("{node_type} node has an invalid span")]
    InvalidSpan { node_type: String },

    /// A required field of a recognized variant is absent.
    #[error("{node_type} at offset {offset} is missing field '{field}'")]
    MissingField {
        node_type: String,
        field: String,
        offset: u64,
    },

    /// A field is present but has the wrong shape.
    #[error("{node_type} at offset {offset} has invalid field '{field}': expected {expected}")]
    InvalidField {
        node_type: String,
        field: String,
        expected: String,
        offset: u64,
    },

    /// The tree has more nodes than a `NodeId` can address.
    #[error("tree exceeds {max} nodes")]
    TooManyNodes { max: u64 },

    /// The document nests objects and arrays deeper than the loader accepts.
    #[error("document nests deeper than {max} levels")]
    TooDeep { max: usize },
}

impl AstError {
    /// Source offset the error refers to, when known.
    pub fn offset(&self) -> Option<u64> {
        match self {
            AstError::MissingField { offset, .. } | AstError::InvalidField { offset, .. } => {
                Some(*offset)
            }
            _ => None,
        }
    }
}

// Bridge into the unified CLI error. It lives here because `AstError` is
// local to this crate.
impl From<AstError> for ShapeError {
    fn from(err: AstError) -> Self {
        ShapeError::MalformedTree {
            offset: err.offset(),
            message: err.to_string(),
        }
    }
}
