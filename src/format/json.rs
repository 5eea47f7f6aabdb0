// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON document codec.
//!
//! The wire shape is a flat list of nodes (discriminated by `type`) and a list of edges. Export
//! emits only the fields of each node's variant, in a fixed order, so the output is
//! deterministic. Import rebuilds a fresh [`Diagram`] and either returns it whole or fails.
//!
//! Import reads only the fields of a node's `type`. Anything else on the node is dropped
//! unread, whatever its JSON type.
//!
//! Blocks carry a `childActions` list on the wire. The model derives that list from each
//! action's `parentBlock`, so on import the action side is authoritative and disagreements are
//! only logged. Export lists children in node order; a list that differs only in order is
//! rewritten silently (logged at debug).

use std::collections::BTreeSet;

use log::{debug, warn};
use schemars::{JsonSchema, Schema};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{
    Action, Block, Diagram, Edge, EdgeId, EdgeKind, Id, IdError, Node, NodeId, Phase, Position,
};
use crate::ops::{check_connection, ConnectError};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field} {value:?}: {source}")]
    InvalidId {
        field: &'static str,
        value: String,
        #[source]
        source: IdError,
    },
    #[error("id used more than once ({id})")]
    DuplicateId { id: String },
    #[error("block {node_id} has no parentPhase")]
    MissingParentPhase { node_id: String },
    #[error("edge {edge_id} is invalid: {source}")]
    InvalidEdge {
        edge_id: String,
        #[source]
        source: ConnectError,
    },
}

/// Top-level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentJson {
    pub nodes: Vec<NodeJson>,
    pub edges: Vec<EdgeJson>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NodeTypeJson {
    Phase,
    Block,
    Action,
}

/// One node. Fields outside the node's `type` are omitted on export and ignored on import.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NodeJson {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeTypeJson,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_actions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    /// `Some(None)` is an explicit `null` (an orphaned action).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub parent_block: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_by: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionJson>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositionJson {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EdgeTypeJson {
    #[default]
    Any,
    Choice,
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeJson {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type", default)]
    pub edge_type: EdgeTypeJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
}

/// The fields every node type shares; the rest are kept raw until `type` is known.
#[derive(Deserialize)]
struct RawNodeJson {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeTypeJson,
    label: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl<'de> Deserialize<'de> for NodeJson {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawNodeJson::deserialize(deserializer)?;
        NodeJson::try_from(raw).map_err(de::Error::custom)
    }
}

impl TryFrom<RawNodeJson> for NodeJson {
    type Error = serde_json::Error;

    fn try_from(raw: RawNodeJson) -> Result<Self, Self::Error> {
        let RawNodeJson { id, node_type, label, mut fields } = raw;
        let mut node = NodeJson {
            id,
            node_type,
            label,
            parent_phase: None,
            child_actions: None,
            expanded: None,
            parent_block: None,
            performed_by: None,
            position: None,
        };

        match node_type {
            NodeTypeJson::Phase => {}
            NodeTypeJson::Block => {
                node.parent_phase = take_field(&mut fields, "parentPhase")?;
                node.child_actions = take_field(&mut fields, "childActions")?;
                node.expanded = take_field(&mut fields, "expanded")?;
            }
            NodeTypeJson::Action => {
                // An explicit `null` is kept apart from an absent field.
                node.parent_block = match fields.remove("parentBlock") {
                    Some(value) => Some(field_value("parentBlock", value)?),
                    None => None,
                };
                node.performed_by = take_field(&mut fields, "performedBy")?;
                node.position = take_field(&mut fields, "position")?;
            }
        }
        Ok(node)
    }
}

fn field_value<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value).map_err(|err| de::Error::custom(format_args!("{key}: {err}")))
}

fn take_field<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, serde_json::Error> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => field_value(key, value).map(Some),
    }
}

impl From<EdgeKind> for EdgeTypeJson {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Any => Self::Any,
            EdgeKind::Choice => Self::Choice,
            EdgeKind::Parallel => Self::Parallel,
        }
    }
}

impl From<EdgeTypeJson> for EdgeKind {
    fn from(edge_type: EdgeTypeJson) -> Self {
        match edge_type {
            EdgeTypeJson::Any => Self::Any,
            EdgeTypeJson::Choice => Self::Choice,
            EdgeTypeJson::Parallel => Self::Parallel,
        }
    }
}

impl From<Position> for PositionJson {
    fn from(position: Position) -> Self {
        Self { x: position.x, y: position.y }
    }
}

impl From<PositionJson> for Position {
    fn from(position: PositionJson) -> Self {
        Self::new(position.x, position.y)
    }
}

pub(crate) fn node_to_json(diagram: &Diagram, node_id: &NodeId, node: &Node) -> NodeJson {
    let mut node_json = NodeJson {
        id: node_id.to_string(),
        node_type: NodeTypeJson::Phase,
        label: node.label().to_owned(),
        parent_phase: None,
        child_actions: None,
        expanded: None,
        parent_block: None,
        performed_by: None,
        position: None,
    };

    match node {
        Node::Phase(_) => {}
        Node::Block(block) => {
            node_json.node_type = NodeTypeJson::Block;
            node_json.parent_phase = Some(block.parent_phase().to_string());
            node_json.child_actions = Some(
                diagram.child_actions(node_id).into_iter().map(ToString::to_string).collect(),
            );
            node_json.expanded = Some(block.expanded());
        }
        Node::Action(action) => {
            node_json.node_type = NodeTypeJson::Action;
            node_json.parent_block = Some(action.parent_block().map(ToString::to_string));
            node_json.performed_by = Some(action.performed_by().to_vec());
            node_json.position = action.position().map(PositionJson::from);
        }
    }

    node_json
}

pub fn diagram_to_json(diagram: &Diagram) -> DocumentJson {
    DocumentJson {
        nodes: diagram
            .nodes()
            .iter()
            .map(|(node_id, node)| node_to_json(diagram, node_id, node))
            .collect(),
        edges: diagram
            .edges()
            .iter()
            .map(|(edge_id, edge)| EdgeJson {
                id: edge_id.to_string(),
                from: edge.from().to_string(),
                to: edge.to().to_string(),
                edge_type: edge.kind().into(),
                descriptor: edge.descriptor().map(ToOwned::to_owned),
            })
            .collect(),
    }
}

fn parse_id<T>(field: &'static str, value: String) -> Result<Id<T>, FormatError> {
    Id::new(value.clone()).map_err(|source| FormatError::InvalidId { field, value, source })
}

fn node_from_json(node_json: NodeJson) -> Result<Node, FormatError> {
    let node = match node_json.node_type {
        NodeTypeJson::Phase => Phase::new(node_json.label).into(),
        NodeTypeJson::Block => {
            let Some(parent_phase) = node_json.parent_phase else {
                return Err(FormatError::MissingParentPhase { node_id: node_json.id });
            };
            let parent_phase = parse_id("nodes[].parentPhase", parent_phase)?;
            let mut block = Block::new(node_json.label, parent_phase);
            block.set_expanded(node_json.expanded.unwrap_or(false));
            block.into()
        }
        NodeTypeJson::Action => {
            let parent_block = node_json
                .parent_block
                .flatten()
                .map(|parent| parse_id("nodes[].parentBlock", parent))
                .transpose()?;
            let mut action = Action::new_with(
                node_json.label,
                parent_block,
                node_json.performed_by.unwrap_or_default(),
            );
            action.set_position(node_json.position.map(Position::from));
            action.into()
        }
    };
    Ok(node)
}

fn log_child_list_mismatch(diagram: &Diagram, block_id: &NodeId, listed: &[String]) {
    let derived = diagram.child_actions(block_id);
    let matches = derived.len() == listed.len()
        && derived.iter().zip(listed).all(|(derived, listed)| derived.as_str() == listed);
    if matches {
        return;
    }
    let derived_set = derived.iter().map(|id| id.as_str()).collect::<BTreeSet<_>>();
    let listed_set = listed.iter().map(String::as_str).collect::<BTreeSet<_>>();
    if derived.len() == listed.len() && derived_set == listed_set {
        debug!(
            block_id:% = block_id,
            listed:? = listed;
            "childActions order differs from node order; exporting in node order"
        );
    } else {
        warn!(
            block_id:% = block_id,
            listed:? = listed,
            derived:? = derived.iter().map(|id| id.as_str()).collect::<Vec<_>>();
            "childActions disagrees with parentBlock pointers; using parentBlock"
        );
    }
}

/// Builds a diagram from a parsed document. Fails on the first invalid entry.
pub fn diagram_from_json(document: DocumentJson) -> Result<Diagram, FormatError> {
    let mut diagram = Diagram::new();
    let mut child_lists = Vec::new();

    for node_json in document.nodes {
        let node_id: NodeId = parse_id("nodes[].id", node_json.id.clone())?;
        if diagram.contains_id(node_id.as_str()) {
            return Err(FormatError::DuplicateId { id: node_id.into_string() });
        }
        if let (NodeTypeJson::Block, Some(listed)) =
            (node_json.node_type, node_json.child_actions.as_ref())
        {
            child_lists.push((node_id.clone(), listed.clone()));
        }
        let node = node_from_json(node_json)?;
        diagram.insert_node(node_id, node);
    }

    for (block_id, listed) in &child_lists {
        log_child_list_mismatch(&diagram, block_id, listed);
    }

    for edge_json in document.edges {
        let edge_id: EdgeId = parse_id("edges[].id", edge_json.id)?;
        if diagram.contains_id(edge_id.as_str()) {
            return Err(FormatError::DuplicateId { id: edge_id.into_string() });
        }
        let from: NodeId = parse_id("edges[].from", edge_json.from)?;
        let to: NodeId = parse_id("edges[].to", edge_json.to)?;
        check_connection(&diagram, from.as_str(), to.as_str()).map_err(|source| {
            FormatError::InvalidEdge { edge_id: edge_id.to_string(), source }
        })?;
        let edge = Edge::new_with(from, to, edge_json.edge_type.into(), edge_json.descriptor);
        diagram.insert_edge(edge_id, edge);
    }

    debug!(nodes = diagram.nodes().len(), edges = diagram.edges().len(); "document imported");
    Ok(diagram)
}

/// Serializes the diagram as pretty-printed JSON (two-space indent).
pub fn export_document(diagram: &Diagram) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&diagram_to_json(diagram))?)
}

pub fn import_document(input: &str) -> Result<Diagram, FormatError> {
    let document: DocumentJson = serde_json::from_str(input)?;
    diagram_from_json(document)
}

/// JSON Schema of the document format.
pub fn document_schema() -> Schema {
    schemars::schema_for!(DocumentJson)
}
