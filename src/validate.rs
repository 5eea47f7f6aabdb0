// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural validation.
//!
//! Validation is advisory: it never blocks a mutation. The store recomputes the full list after
//! every committed change and exposes it as a snapshot.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Diagram, Node, NodeId, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// A phase owns no block.
    MissingBlocks,
    /// A block owns no action.
    MissingActions,
    /// An action is not nested in any block.
    OrphanedAction,
    /// A parent pointer names a node that does not exist (strict mode only).
    OrphanedNode,
}

impl ValidationErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingBlocks => "missing_blocks",
            Self::MissingActions => "missing_actions",
            Self::OrphanedAction => "orphaned_action",
            Self::OrphanedNode => "orphaned_node",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    message: String,
    #[serde(rename = "nodeId", skip_serializing_if = "Option::is_none")]
    node_id: Option<String>,
}

impl ValidationError {
    fn for_node(kind: ValidationErrorKind, node_id: &NodeId, message: String) -> Self {
        Self { kind, message, node_id: Some(node_id.to_string()) }
    }

    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node_id {
            Some(node_id) => write!(f, "[{}] {} ({node_id})", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Which checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Completeness checks plus orphaned actions.
    #[default]
    Standard,
    /// Standard checks plus dangling parent references (`orphaned_node`).
    Strict,
}

/// Walks the diagram and returns every structural violation.
///
/// Order: phases without blocks, blocks without actions, orphaned actions, then (strict only)
/// dangling parent references. Within each pass, node order.
pub fn validate_diagram(diagram: &Diagram, mode: ValidationMode) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (phase_id, node) in diagram.nodes_by_kind(NodeKind::Phase) {
        if diagram.phase_blocks(phase_id).is_empty() {
            errors.push(ValidationError::for_node(
                ValidationErrorKind::MissingBlocks,
                phase_id,
                format!("Phase \"{}\" must have at least one block", node.label()),
            ));
        }
    }

    for (block_id, node) in diagram.nodes_by_kind(NodeKind::Block) {
        if diagram.child_actions(block_id).is_empty() {
            errors.push(ValidationError::for_node(
                ValidationErrorKind::MissingActions,
                block_id,
                format!("Block \"{}\" must have at least one action", node.label()),
            ));
        }
    }

    for (action_id, node) in diagram.nodes_by_kind(NodeKind::Action) {
        if node.as_action().is_some_and(|action| action.is_orphaned()) {
            errors.push(ValidationError::for_node(
                ValidationErrorKind::OrphanedAction,
                action_id,
                format!("Action \"{}\" is not assigned to a block", node.label()),
            ));
        }
    }

    if mode == ValidationMode::Strict {
        push_dangling_parent_errors(diagram, &mut errors);
    }

    errors
}

fn push_dangling_parent_errors(diagram: &Diagram, errors: &mut Vec<ValidationError>) {
    for (node_id, node) in diagram.nodes() {
        match node {
            Node::Phase(_) => {}
            Node::Block(block) => {
                if diagram.node_kind(block.parent_phase().as_str()) != Some(NodeKind::Phase) {
                    errors.push(ValidationError::for_node(
                        ValidationErrorKind::OrphanedNode,
                        node_id,
                        format!("Block \"{}\" has missing parent phase", block.label()),
                    ));
                }
            }
            Node::Action(action) => {
                let Some(parent_block) = action.parent_block() else {
                    continue;
                };
                if diagram.node_kind(parent_block.as_str()) != Some(NodeKind::Block) {
                    errors.push(ValidationError::for_node(
                        ValidationErrorKind::OrphanedNode,
                        node_id,
                        format!("Action \"{}\" has missing parent block", action.label()),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_diagram, ValidationErrorKind, ValidationMode};
    use crate::model::samples::{sample_diagram, sample_diagram_with_branching};
    use crate::model::{Action, Block, Diagram, NodeId, Phase};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn kinds_and_ids(diagram: &Diagram, mode: ValidationMode) -> Vec<(ValidationErrorKind, String)> {
        validate_diagram(diagram, mode)
            .into_iter()
            .map(|err| (err.kind(), err.node_id().unwrap_or_default().to_owned()))
            .collect()
    }

    #[test]
    fn empty_diagram_is_valid() {
        assert!(validate_diagram(&Diagram::new(), ValidationMode::Strict).is_empty());
    }

    #[test]
    fn checks_run_in_documented_order() {
        let mut diagram = Diagram::new();
        diagram.insert_node(nid("a1"), Action::new("A").into());
        diagram.insert_node(nid("b1"), Block::new("B", nid("p2")).into());
        diagram.insert_node(nid("p1"), Phase::new("P").into());

        assert_eq!(
            kinds_and_ids(&diagram, ValidationMode::Standard),
            vec![
                (ValidationErrorKind::MissingBlocks, "p1".to_owned()),
                (ValidationErrorKind::MissingActions, "b1".to_owned()),
                (ValidationErrorKind::OrphanedAction, "a1".to_owned()),
            ]
        );
    }

    #[test]
    fn strict_mode_reports_dangling_parents() {
        let mut diagram = Diagram::new();
        diagram.insert_node(nid("p1"), Phase::new("P").into());
        diagram.insert_node(nid("b1"), Block::new("B", nid("gone")).into());
        diagram.insert_node(nid("a1"), Action::new_with("A", Some(nid("b1")), vec![]).into());
        diagram.insert_node(nid("a2"), Action::new_with("A2", Some(nid("p1")), vec![]).into());

        let standard = kinds_and_ids(&diagram, ValidationMode::Standard);
        assert!(standard.iter().all(|(kind, _)| *kind != ValidationErrorKind::OrphanedNode));

        let strict = kinds_and_ids(&diagram, ValidationMode::Strict);
        let orphaned_nodes = strict
            .iter()
            .filter(|(kind, _)| *kind == ValidationErrorKind::OrphanedNode)
            .map(|(_, id)| id.as_str())
            .collect::<Vec<_>>();
        // a2 points at a phase, which is not a block.
        assert_eq!(orphaned_nodes, vec!["b1", "a2"]);
    }

    #[test]
    fn messages_name_the_offending_label() {
        let mut diagram = Diagram::new();
        diagram.insert_node(nid("p1"), Phase::new("Onboarding").into());
        let errors = validate_diagram(&diagram, ValidationMode::Standard);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Phase \"Onboarding\" must have at least one block");
        assert_eq!(errors[0].to_string(), "[missing_blocks] Phase \"Onboarding\" must have at least one block (p1)");
    }

    #[test]
    fn samples_only_report_their_orphans() {
        for diagram in [sample_diagram(), sample_diagram_with_branching()] {
            let errors = validate_diagram(&diagram, ValidationMode::Strict);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].kind(), ValidationErrorKind::OrphanedAction);
        }
    }

    #[test]
    fn validation_errors_serialize_with_node_id_key() {
        let mut diagram = Diagram::new();
        diagram.insert_node(nid("p1"), Phase::new("P").into());
        let errors = validate_diagram(&diagram, ValidationMode::Standard);
        let json = serde_json::to_value(&errors).expect("serialize");
        assert_eq!(json[0]["kind"], "missing_blocks");
        assert_eq!(json[0]["nodeId"], "p1");
    }
}
