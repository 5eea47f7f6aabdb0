// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::ids::{EntityKind, NodeId};

/// The structural level of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Phase,
    Block,
    Action,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phase => "phase",
            Self::Block => "block",
            Self::Action => "action",
        }
    }

    pub fn entity_kind(self) -> EntityKind {
        match self {
            Self::Phase => EntityKind::Phase,
            Self::Block => EntityKind::Block,
            Self::Action => EntityKind::Action,
        }
    }

    /// Whether nodes of this kind may be the `from`/`to` of an edge.
    pub fn is_edge_endpoint(self) -> bool {
        matches!(self, Self::Block | Self::Action)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagram node. The id lives in the owning [`Diagram`](super::Diagram) map, not here.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Phase(Phase),
    Block(Block),
    Action(Action),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Phase(_) => NodeKind::Phase,
            Self::Block(_) => NodeKind::Block,
            Self::Action(_) => NodeKind::Action,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Phase(phase) => phase.label(),
            Self::Block(block) => block.label(),
            Self::Action(action) => action.label(),
        }
    }

    pub fn as_phase(&self) -> Option<&Phase> {
        match self {
            Self::Phase(phase) => Some(phase),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Self::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Action(action) => Some(action),
            _ => None,
        }
    }

    /// The id of the structural parent, if this kind has one and it is set.
    pub fn parent_id(&self) -> Option<&NodeId> {
        match self {
            Self::Phase(_) => None,
            Self::Block(block) => Some(block.parent_phase()),
            Self::Action(action) => action.parent_block(),
        }
    }
}

impl From<Phase> for Node {
    fn from(phase: Phase) -> Self {
        Self::Phase(phase)
    }
}

impl From<Block> for Node {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<Action> for Node {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

/// Top-level grouping. Has no parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    label: String,
}

impl Phase {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

/// Mid-level grouping owned by a phase.
///
/// Child actions are not stored here: they are derived from each action's parent pointer via
/// [`Diagram::child_actions`](super::Diagram::child_actions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    label: String,
    parent_phase: NodeId,
    expanded: bool,
}

impl Block {
    pub fn new(label: impl Into<String>, parent_phase: NodeId) -> Self {
        Self { label: label.into(), parent_phase, expanded: false }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn parent_phase(&self) -> &NodeId {
        &self.parent_phase
    }

    pub fn set_parent_phase(&mut self, parent_phase: NodeId) {
        self.parent_phase = parent_phase;
    }

    /// UI-only toggle: whether child actions render inline.
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }
}

/// Leaf unit of work, optionally nested in a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    label: String,
    parent_block: Option<NodeId>,
    performed_by: Vec<String>,
    position: Option<Position>,
}

impl Action {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), parent_block: None, performed_by: Vec::new(), position: None }
    }

    pub fn new_with(
        label: impl Into<String>,
        parent_block: Option<NodeId>,
        performed_by: Vec<String>,
    ) -> Self {
        Self { label: label.into(), parent_block, performed_by, position: None }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn parent_block(&self) -> Option<&NodeId> {
        self.parent_block.as_ref()
    }

    /// Only the diagram aggregate re-parents actions, so nesting stays a single transition.
    pub(crate) fn set_parent_block(&mut self, parent_block: Option<NodeId>) {
        self.parent_block = parent_block;
    }

    pub fn is_orphaned(&self) -> bool {
        self.parent_block.is_none()
    }

    pub fn performed_by(&self) -> &[String] {
        &self.performed_by
    }

    pub fn set_performed_by(&mut self, performed_by: Vec<String>) {
        self.performed_by = performed_by;
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}

/// Placement hint in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// JSON has no encoding for NaN or infinity.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Block, Node, NodeKind, Phase, Position};
    use crate::model::NodeId;

    #[test]
    fn block_defaults_to_collapsed() {
        let block = Block::new("Login", NodeId::new("p1").expect("phase id"));
        assert!(!block.expanded());
        assert_eq!(block.parent_phase().as_str(), "p1");
    }

    #[test]
    fn action_can_be_constructed_and_updated() {
        let mut action = Action::new("Submit form");
        assert!(action.is_orphaned());
        assert!(action.performed_by().is_empty());
        assert_eq!(action.position(), None);

        action.set_label("Submit");
        action.set_performed_by(vec!["user".to_owned(), "user".to_owned(), String::new()]);
        action.set_position(Some(Position::new(10.0, 20.5)));

        assert_eq!(action.label(), "Submit");
        // Duplicates and empty names are kept verbatim.
        assert_eq!(action.performed_by().len(), 3);
        assert_eq!(action.position(), Some(Position::new(10.0, 20.5)));
    }

    #[test]
    fn only_blocks_and_actions_are_edge_endpoints() {
        assert!(!NodeKind::Phase.is_edge_endpoint());
        assert!(NodeKind::Block.is_edge_endpoint());
        assert!(NodeKind::Action.is_edge_endpoint());
    }

    #[test]
    fn node_exposes_kind_label_and_parent() {
        let phase = Node::from(Phase::new("P"));
        assert_eq!(phase.kind(), NodeKind::Phase);
        assert_eq!(phase.parent_id(), None);

        let block = Node::from(Block::new("B", NodeId::new("p1").expect("id")));
        assert_eq!(block.label(), "B");
        assert_eq!(block.parent_id().map(NodeId::as_str), Some("p1"));

        let action = Node::from(Action::new_with(
            "A",
            Some(NodeId::new("b1").expect("id")),
            vec!["system".to_owned()],
        ));
        assert_eq!(action.kind().as_str(), "action");
        assert_eq!(action.parent_id().map(NodeId::as_str), Some("b1"));
        assert!(action.as_block().is_none());
    }
}
