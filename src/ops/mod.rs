// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations on a [`Diagram`].
//!
//! Every operation validates its inputs before touching the model, so a returned error means the
//! diagram is unchanged. Patches are typed per node variant: a block-only field cannot be applied
//! to a phase.

use thiserror::Error;

use crate::model::{Diagram, Edge, EdgeId, EdgeKind, Node, NodeId, NodeKind, Position};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhasePatch {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPatch {
    pub label: Option<String>,
    pub parent_phase: Option<NodeId>,
    pub expanded: Option<bool>,
}

/// Field updates for an action. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionPatch {
    pub label: Option<String>,
    pub parent_block: Option<Option<NodeId>>,
    pub performed_by: Option<Vec<String>>,
    pub position: Option<Option<Position>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodePatch {
    Phase(PhasePatch),
    Block(BlockPatch),
    Action(ActionPatch),
}

impl NodePatch {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Phase(_) => NodeKind::Phase,
            Self::Block(_) => NodeKind::Block,
            Self::Action(_) => NodeKind::Action,
        }
    }
}

impl From<PhasePatch> for NodePatch {
    fn from(patch: PhasePatch) -> Self {
        Self::Phase(patch)
    }
}

impl From<BlockPatch> for NodePatch {
    fn from(patch: BlockPatch) -> Self {
        Self::Block(patch)
    }
}

impl From<ActionPatch> for NodePatch {
    fn from(patch: ActionPatch) -> Self {
        Self::Action(patch)
    }
}

/// Edge endpoints are fixed once created; re-route by deleting and adding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgePatch {
    pub kind: Option<EdgeKind>,
    pub descriptor: Option<Option<String>>,
}

/// Why a `from -> to` edge is not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("node not found (id={node_id})")]
    UnknownNode { node_id: String },
    #[error("edge would connect node {node_id} to itself")]
    SelfLoop { node_id: String },
    #[error("edge {from} -> {to} already exists")]
    Duplicate { from: String, to: String },
    #[error("{kind} {node_id} cannot be an edge endpoint")]
    InvalidEndpoint { node_id: String, kind: NodeKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("id already in use ({id})")]
    DuplicateId { id: String },
    #[error("node not found (id={node_id})")]
    NodeNotFound { node_id: String },
    #[error("edge not found (id={edge_id})")]
    EdgeNotFound { edge_id: String },
    #[error("node {node_id} is a {found}, expected a {expected}")]
    KindMismatch { node_id: String, expected: NodeKind, found: NodeKind },
    #[error("invalid edge: {0}")]
    InvalidEdge(#[from] ConnectError),
    #[error("position of {node_id} must have finite coordinates")]
    NonFinitePosition { node_id: String },
}

/// Edge policy shared by the connection gesture, [`add_edge`] and import.
///
/// Rejects unknown endpoints, self-loops, an existing edge with the same ordered pair, and any
/// endpoint that is not a block or an action. Every block/action pairing is allowed, in either
/// direction.
pub fn check_connection(diagram: &Diagram, from: &str, to: &str) -> Result<(), ConnectError> {
    let from_kind = diagram
        .node_kind(from)
        .ok_or_else(|| ConnectError::UnknownNode { node_id: from.to_owned() })?;
    let to_kind = diagram
        .node_kind(to)
        .ok_or_else(|| ConnectError::UnknownNode { node_id: to.to_owned() })?;

    if from == to {
        return Err(ConnectError::SelfLoop { node_id: from.to_owned() });
    }
    if diagram.has_edge_between(from, to) {
        return Err(ConnectError::Duplicate { from: from.to_owned(), to: to.to_owned() });
    }
    for (node_id, kind) in [(from, from_kind), (to, to_kind)] {
        if !kind.is_edge_endpoint() {
            return Err(ConnectError::InvalidEndpoint { node_id: node_id.to_owned(), kind });
        }
    }
    Ok(())
}

fn ensure_id_free(diagram: &Diagram, id: &str) -> Result<(), EditError> {
    if diagram.contains_id(id) {
        return Err(EditError::DuplicateId { id: id.to_owned() });
    }
    Ok(())
}

fn expect_kind(diagram: &Diagram, node_id: &str, expected: NodeKind) -> Result<(), EditError> {
    let found = diagram
        .node_kind(node_id)
        .ok_or_else(|| EditError::NodeNotFound { node_id: node_id.to_owned() })?;
    if found != expected {
        return Err(EditError::KindMismatch { node_id: node_id.to_owned(), expected, found });
    }
    Ok(())
}

fn ensure_finite(node_id: &str, position: Option<Position>) -> Result<(), EditError> {
    if position.is_some_and(|position| !position.is_finite()) {
        return Err(EditError::NonFinitePosition { node_id: node_id.to_owned() });
    }
    Ok(())
}

/// Appends a node. Parent pointers may name nodes that do not exist yet.
pub fn add_node(diagram: &mut Diagram, node_id: NodeId, node: Node) -> Result<(), EditError> {
    ensure_id_free(diagram, node_id.as_str())?;
    if let Node::Action(action) = &node {
        ensure_finite(node_id.as_str(), action.position())?;
    }
    diagram.insert_node(node_id, node);
    Ok(())
}

pub fn update_node(
    diagram: &mut Diagram,
    node_id: &str,
    patch: NodePatch,
) -> Result<(), EditError> {
    let Some(existing) = diagram.node_mut(node_id) else {
        return Err(EditError::NodeNotFound { node_id: node_id.to_owned() });
    };

    match (existing, patch) {
        (Node::Phase(phase), NodePatch::Phase(patch)) => {
            if let Some(label) = patch.label {
                phase.set_label(label);
            }
        }
        (Node::Block(block), NodePatch::Block(patch)) => {
            if let Some(label) = patch.label {
                block.set_label(label);
            }
            if let Some(parent_phase) = patch.parent_phase {
                block.set_parent_phase(parent_phase);
            }
            if let Some(expanded) = patch.expanded {
                block.set_expanded(expanded);
            }
        }
        (Node::Action(action), NodePatch::Action(patch)) => {
            if let Some(position) = patch.position {
                ensure_finite(node_id, position)?;
            }
            if let Some(label) = patch.label {
                action.set_label(label);
            }
            if let Some(parent_block) = patch.parent_block {
                action.set_parent_block(parent_block);
            }
            if let Some(performed_by) = patch.performed_by {
                action.set_performed_by(performed_by);
            }
            if let Some(position) = patch.position {
                action.set_position(position);
            }
        }
        (existing, patch) => {
            return Err(EditError::KindMismatch {
                node_id: node_id.to_owned(),
                expected: patch.kind(),
                found: existing.kind(),
            });
        }
    }
    Ok(())
}

/// Removes a node and every edge touching it; returns the removed edge ids.
///
/// Child blocks/actions are not deleted. Their parent pointers dangle until re-parented.
pub fn delete_node(diagram: &mut Diagram, node_id: &str) -> Result<Vec<EdgeId>, EditError> {
    diagram
        .remove_node(node_id)
        .map(|(_, removed_edges)| removed_edges)
        .ok_or_else(|| EditError::NodeNotFound { node_id: node_id.to_owned() })
}

pub fn add_edge(diagram: &mut Diagram, edge_id: EdgeId, edge: Edge) -> Result<(), EditError> {
    ensure_id_free(diagram, edge_id.as_str())?;
    check_connection(diagram, edge.from().as_str(), edge.to().as_str())?;
    diagram.insert_edge(edge_id, edge);
    Ok(())
}

pub fn update_edge(
    diagram: &mut Diagram,
    edge_id: &str,
    patch: EdgePatch,
) -> Result<(), EditError> {
    let Some(edge) = diagram.edge_mut(edge_id) else {
        return Err(EditError::EdgeNotFound { edge_id: edge_id.to_owned() });
    };
    if let Some(kind) = patch.kind {
        edge.set_kind(kind);
    }
    if let Some(descriptor) = patch.descriptor {
        edge.set_descriptor(descriptor);
    }
    Ok(())
}

pub fn delete_edge(diagram: &mut Diagram, edge_id: &str) -> Result<Edge, EditError> {
    diagram
        .remove_edge(edge_id)
        .ok_or_else(|| EditError::EdgeNotFound { edge_id: edge_id.to_owned() })
}

/// Nests an action in a block, leaving any previous block, and expands the target block.
///
/// Idempotent. Returns the block the action was previously nested in.
pub fn nest_action_in_block(
    diagram: &mut Diagram,
    action_id: &str,
    block_id: &str,
) -> Result<Option<NodeId>, EditError> {
    expect_kind(diagram, action_id, NodeKind::Action)?;
    expect_kind(diagram, block_id, NodeKind::Block)?;

    // Reuse the stored key rather than re-validating the raw id.
    let block_id = diagram
        .nodes()
        .get_key_value(block_id)
        .map(|(id, _)| id.clone())
        .ok_or_else(|| EditError::NodeNotFound { node_id: block_id.to_owned() })?;
    let previous = diagram.unnest_action(action_id);
    diagram.nest_action(action_id, &block_id);
    Ok(previous)
}

/// Clears an action's block; returns the block it left, if any.
pub fn remove_action_from_block(
    diagram: &mut Diagram,
    action_id: &str,
) -> Result<Option<NodeId>, EditError> {
    expect_kind(diagram, action_id, NodeKind::Action)?;
    Ok(diagram.unnest_action(action_id))
}

#[cfg(test)]
mod tests;
