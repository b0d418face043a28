// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Loading ESTree JSON into an [`Ast`].
//!
//! Any ESTree producer works as long as every node carries its source span,
//! either as acorn-style `start`/`end` offsets or as an espree-style
//! `range: [start, end]` pair. Recognized variants are lowered into typed
//! payloads and must carry their required fields; every other object with a
//! string `type` becomes an [`OtherNode`] whose fields are converted
//! reflectively.
//!
//! NodeIds are handed out in pre-order while lowering, in the same field
//! order [`NodeKind::children`] reports, so the root is `NodeId(0)`.
//!
//! Documents may nest up to [`MAX_NESTING_DEPTH`] objects and arrays.
//! Parsing and lowering grow the stack as needed below that bound.

use serde::Deserialize;
use serde_json::{Map, Value};
use shapefinder_core::Span;

use crate::error::AstError;
use crate::nodes::{
    ArrowFunctionExpression, AssignmentExpression, BinaryExpression, BlockStatement,
    CallExpression, Field, ForInStatement, ForOfStatement, ForStatement, FunctionDeclaration,
    FunctionExpression, Identifier, Literal, MemberExpression, Node, NodeId, NodeKind,
    ObjectExpression, OtherNode, Program, Property, VariableDeclaration, VariableDeclarator,
};
use crate::tree::{with_stack, Ast};

/// Keys that describe a node rather than hold its content.
const METADATA_KEYS: &[&str] = &["type", "start", "end", "range", "loc"];

/// Deepest object/array nesting accepted in an ESTree document.
///
/// A left-leaning `a + b + ...` chain costs one level per operator and a
/// nested block about three, so hand-written programs stay far below it.
pub const MAX_NESTING_DEPTH: usize = 4096;

impl Ast {
    /// Parse an ESTree JSON document produced from `source`.
    pub fn from_estree_json(source: impl Into<String>, json: &str) -> Result<Ast, AstError> {
        if nesting_depth(json) > MAX_NESTING_DEPTH {
            return Err(AstError::TooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Self::from_estree_value(source, &value)
    }

    /// Lower an already-parsed ESTree document produced from `source`.
    pub fn from_estree_value(source: impl Into<String>, value: &Value) -> Result<Ast, AstError> {
        let mut loader = Loader::default();
        loader.lower(value, "document root")?;
        let nodes: Vec<Node> = loader.slots.into_iter().flatten().collect();
        tracing::debug!(nodes = nodes.len(), "loaded ESTree document");
        Ok(Ast::from_nodes(source.into(), nodes))
    }
}

/// Deepest `{`/`[` nesting in a JSON text, ignoring brackets inside strings.
fn nesting_depth(json: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// True if `value` is a JSON object with a string `type`.
pub fn is_estree_node(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("type"))
        .is_some_and(Value::is_string)
}

// ============================================================================
// Loader
// ============================================================================

#[derive(Default)]
struct Loader {
    /// Filled in pre-order; a slot is reserved before its children are lowered.
    slots: Vec<Option<Node>>,
}

/// The object being lowered plus what error messages need to know about it.
struct NodeCx<'v> {
    obj: &'v Map<String, Value>,
    type_name: &'v str,
    offset: u64,
}

impl NodeCx<'_> {
    fn missing(&self, field: &str) -> AstError {
        AstError::MissingField {
            node_type: self.type_name.to_string(),
            field: field.to_string(),
            offset: self.offset,
        }
    }

    fn invalid(&self, field: &str, expected: &str) -> AstError {
        AstError::InvalidField {
            node_type: self.type_name.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
            offset: self.offset,
        }
    }

    /// Field value, treating JSON `null` as absent.
    fn get(&self, field: &str) -> Option<&Value> {
        self.obj.get(field).filter(|v| !v.is_null())
    }

    fn string(&self, field: &str) -> Result<String, AstError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(field, "string"))
    }

    fn opt_string(&self, field: &str) -> Result<Option<String>, AstError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.invalid(field, "string")),
        }
    }

    /// Boolean flag; absent means false.
    fn flag(&self, field: &str) -> Result<bool, AstError> {
        match self.get(field) {
            None => Ok(false),
            Some(v) => v.as_bool().ok_or_else(|| self.invalid(field, "boolean")),
        }
    }
}

impl Loader {
    fn reserve(&mut self) -> Result<NodeId, AstError> {
        let id = u32::try_from(self.slots.len()).map_err(|_| AstError::TooManyNodes {
            max: u64::from(u32::MAX),
        })?;
        self.slots.push(None);
        Ok(NodeId(id))
    }

    fn lower(&mut self, value: &Value, context: &str) -> Result<NodeId, AstError> {
        with_stack(|| self.lower_node(value, context))
    }

    fn lower_node(&mut self, value: &Value, context: &str) -> Result<NodeId, AstError> {
        let not_a_node = || AstError::NotANode {
            context: context.to_string(),
        };
        let obj = value.as_object().ok_or_else(not_a_node)?;
        let type_name = obj.get("type").and_then(Value::as_str).ok_or_else(not_a_node)?;
        let span = read_span(obj, type_name)?;

        let id = self.reserve()?;
        let cx = NodeCx {
            obj,
            type_name,
            offset: span.start,
        };

        // Fields are lowered in the order `NodeKind::children` reports them.
        let kind = match type_name {
            "Program" => NodeKind::Program(Program {
                body: self.node_list(&cx, "body")?,
                source_type: cx.opt_string("sourceType")?,
            }),
            "VariableDeclaration" => NodeKind::VariableDeclaration(VariableDeclaration {
                declarations: self.node_list(&cx, "declarations")?,
                kind: cx.string("kind")?,
            }),
            "VariableDeclarator" => NodeKind::VariableDeclarator(VariableDeclarator {
                id: self.node(&cx, "id")?,
                init: self.opt_node(&cx, "init")?,
            }),
            "Identifier" => NodeKind::Identifier(Identifier {
                name: cx.string("name")?,
            }),
            "Literal" => NodeKind::Literal(Literal {
                raw: cx.opt_string("raw")?,
                value: obj.get("value").cloned().unwrap_or(Value::Null),
            }),
            "MemberExpression" => NodeKind::MemberExpression(MemberExpression {
                object: self.node(&cx, "object")?,
                property: self.node(&cx, "property")?,
                computed: cx.flag("computed")?,
                optional: cx.flag("optional")?,
            }),
            "CallExpression" => NodeKind::CallExpression(CallExpression {
                callee: self.node(&cx, "callee")?,
                arguments: self.node_list(&cx, "arguments")?,
                optional: cx.flag("optional")?,
            }),
            "AssignmentExpression" => NodeKind::AssignmentExpression(AssignmentExpression {
                operator: cx.string("operator")?,
                left: self.node(&cx, "left")?,
                right: self.node(&cx, "right")?,
            }),
            "BinaryExpression" => NodeKind::BinaryExpression(BinaryExpression {
                operator: cx.string("operator")?,
                left: self.node(&cx, "left")?,
                right: self.node(&cx, "right")?,
            }),
            "FunctionDeclaration" => NodeKind::FunctionDeclaration(FunctionDeclaration {
                id: self.opt_node(&cx, "id")?,
                params: self.node_list(&cx, "params")?,
                body: self.node(&cx, "body")?,
                is_async: cx.flag("async")?,
                generator: cx.flag("generator")?,
            }),
            "FunctionExpression" => NodeKind::FunctionExpression(FunctionExpression {
                id: self.opt_node(&cx, "id")?,
                params: self.node_list(&cx, "params")?,
                body: self.node(&cx, "body")?,
                is_async: cx.flag("async")?,
                generator: cx.flag("generator")?,
            }),
            "ArrowFunctionExpression" => {
                NodeKind::ArrowFunctionExpression(ArrowFunctionExpression {
                    params: self.node_list(&cx, "params")?,
                    body: self.node(&cx, "body")?,
                    expression: cx.flag("expression")?,
                    is_async: cx.flag("async")?,
                })
            }
            "BlockStatement" => NodeKind::BlockStatement(BlockStatement {
                body: self.node_list(&cx, "body")?,
            }),
            "ForStatement" => NodeKind::ForStatement(ForStatement {
                init: self.opt_node(&cx, "init")?,
                test: self.opt_node(&cx, "test")?,
                update: self.opt_node(&cx, "update")?,
                body: self.node(&cx, "body")?,
            }),
            "ForOfStatement" => NodeKind::ForOfStatement(ForOfStatement {
                left: self.node(&cx, "left")?,
                right: self.node(&cx, "right")?,
                body: self.node(&cx, "body")?,
                is_await: cx.flag("await")?,
            }),
            "ForInStatement" => NodeKind::ForInStatement(ForInStatement {
                left: self.node(&cx, "left")?,
                right: self.node(&cx, "right")?,
                body: self.node(&cx, "body")?,
            }),
            "ObjectExpression" => NodeKind::ObjectExpression(ObjectExpression {
                properties: self.node_list(&cx, "properties")?,
            }),
            "Property" => NodeKind::Property(Property {
                key: self.node(&cx, "key")?,
                value: self.node(&cx, "value")?,
                computed: cx.flag("computed")?,
                kind: cx.opt_string("kind")?.unwrap_or_else(|| "init".to_string()),
                method: cx.flag("method")?,
                shorthand: cx.flag("shorthand")?,
            }),
            _ => NodeKind::Other(self.lower_other(&cx)?),
        };

        self.slots[id.index()] = Some(Node { id, span, kind });
        Ok(id)
    }

    /// Required single-node field.
    fn node(&mut self, cx: &NodeCx<'_>, field: &str) -> Result<NodeId, AstError> {
        let value = cx.get(field).ok_or_else(|| cx.missing(field))?;
        if !is_estree_node(value) {
            return Err(cx.invalid(field, "node"));
        }
        self.lower(value, &format!("{}.{}", cx.type_name, field))
    }

    /// Optional single-node field; absent and `null` are both `None`.
    fn opt_node(&mut self, cx: &NodeCx<'_>, field: &str) -> Result<Option<NodeId>, AstError> {
        match cx.get(field) {
            None => Ok(None),
            Some(_) => self.node(cx, field).map(Some),
        }
    }

    /// Required node-sequence field.
    ///
    /// A single node where a sequence is expected is treated as a
    /// one-element sequence.
    fn node_list(&mut self, cx: &NodeCx<'_>, field: &str) -> Result<Vec<NodeId>, AstError> {
        let value = cx.get(field).ok_or_else(|| cx.missing(field))?;
        match value {
            Value::Array(items) => {
                let context = format!("{}.{}", cx.type_name, field);
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    if !is_estree_node(item) {
                        return Err(cx.invalid(field, "array of nodes"));
                    }
                    ids.push(self.lower(item, &context)?);
                }
                Ok(ids)
            }
            single if is_estree_node(single) => Ok(vec![self.node(cx, field)?]),
            _ => Err(cx.invalid(field, "array of nodes")),
        }
    }

    fn lower_other(&mut self, cx: &NodeCx<'_>) -> Result<OtherNode, AstError> {
        let mut fields = Vec::new();
        for (key, value) in cx.obj {
            if METADATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            let context = format!("{}.{}", cx.type_name, key);
            fields.push((key.clone(), self.lower_field(value, &context)?));
        }
        Ok(OtherNode {
            type_name: cx.type_name.to_string(),
            fields,
        })
    }

    fn lower_field(&mut self, value: &Value, context: &str) -> Result<Field, AstError> {
        with_stack(|| self.lower_field_value(value, context))
    }

    fn lower_field_value(&mut self, value: &Value, context: &str) -> Result<Field, AstError> {
        if is_estree_node(value) {
            return self.lower(value, context).map(Field::Node);
        }
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.lower_field(item, context))
                .collect::<Result<Vec<_>, _>>()
                .map(Field::List),
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, entry) in map {
                    entries.push((key.clone(), self.lower_field(entry, context)?));
                }
                Ok(Field::Map(entries))
            }
            scalar => Ok(Field::Scalar(scalar.clone())),
        }
    }
}

/// Read `start`/`end`, falling back to `range`.
fn read_span(obj: &Map<String, Value>, type_name: &str) -> Result<Span, AstError> {
    let invalid = || AstError::InvalidSpan {
        node_type: type_name.to_string(),
    };

    let (start, end) = match (obj.get("start"), obj.get("end")) {
        (Some(start), Some(end)) => (start, end),
        _ => match obj.get("range").and_then(Value::as_array) {
            Some(range) if range.len() == 2 => (&range[0], &range[1]),
            Some(_) => return Err(invalid()),
            None => {
                return Err(AstError::MissingSpan {
                    node_type: type_name.to_string(),
                })
            }
        },
    };

    let start = start.as_u64().ok_or_else(invalid)?;
    let end = end.as_u64().ok_or_else(invalid)?;
    Span::try_new(start, end).ok_or_else(invalid)
}
