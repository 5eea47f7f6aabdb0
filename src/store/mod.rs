// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The diagram store: the single mutation entry point for a [`Diagram`].
//!
//! Besides the model, the store owns editor session state that is not part of the exported
//! document: the current node/edge selection and the connection gesture. Every committed
//! mutation bumps [`DiagramStore::rev`] and recomputes the validation snapshot before
//! returning, so readers never observe a stale error list.

mod connection;

use log::{debug, trace};

use crate::format::{export_document, import_document, FormatError};
use crate::model::{Diagram, Edge, EdgeId, EdgeKind, EntityKind, Id, Node, NodeId};
use crate::ops::{self, EdgePatch, EditError, NodePatch};
use crate::validate::{validate_diagram, ValidationError, ValidationMode};

pub use connection::{ConnectionState, NodeClick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreOptions {
    pub validation_mode: ValidationMode,
    /// Edge type used when a completed gesture does not name one.
    pub default_edge_kind: EdgeKind,
}

#[derive(Debug, Clone)]
pub struct DiagramStore {
    diagram: Diagram,
    options: StoreOptions,
    rev: u64,
    validation_errors: Vec<ValidationError>,
    selected_node_id: Option<NodeId>,
    selected_edge_id: Option<EdgeId>,
    connection: ConnectionState,
}

impl Default for DiagramStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramStore {
    pub fn new() -> Self {
        Self::with_diagram(Diagram::new(), StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self::with_diagram(Diagram::new(), options)
    }

    pub fn with_diagram(diagram: Diagram, options: StoreOptions) -> Self {
        let validation_errors = validate_diagram(&diagram, options.validation_mode);
        Self {
            diagram,
            options,
            rev: 0,
            validation_errors,
            selected_node_id: None,
            selected_edge_id: None,
            connection: ConnectionState::Idle,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Number of committed mutations since the store was created.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// The snapshot computed after the last committed mutation.
    pub fn validation_errors(&self) -> &[ValidationError] {
        &self.validation_errors
    }

    /// Re-runs validation and replaces the snapshot.
    pub fn validate_model(&mut self) -> &[ValidationError] {
        self.validation_errors = validate_diagram(&self.diagram, self.options.validation_mode);
        trace!(errors = self.validation_errors.len(); "validation run");
        &self.validation_errors
    }

    /// Switching modes re-runs validation.
    pub fn set_validation_mode(&mut self, mode: ValidationMode) {
        if self.options.validation_mode == mode {
            return;
        }
        self.options.validation_mode = mode;
        self.validate_model();
    }

    fn commit(&mut self) {
        self.rev = self.rev.wrapping_add(1);
        self.validate_model();
    }

    /// An id of the given kind that no node or edge currently uses.
    pub fn generate_id(&self, kind: EntityKind) -> String {
        self.fresh_id::<()>(kind).into_string()
    }

    fn fresh_id<T>(&self, kind: EntityKind) -> Id<T> {
        loop {
            let id = Id::generated(kind);
            if !self.diagram.contains_id(id.as_str()) {
                return id;
            }
        }
    }

    pub fn add_node(&mut self, node_id: NodeId, node: Node) -> Result<(), EditError> {
        let kind = node.kind();
        ops::add_node(&mut self.diagram, node_id.clone(), node)?;
        debug!(node_id:% = node_id, kind:% = kind; "node added");
        self.commit();
        Ok(())
    }

    /// Adds a node under a freshly generated id and returns that id.
    pub fn create_node(&mut self, node: Node) -> Result<NodeId, EditError> {
        let node_id: NodeId = self.fresh_id(node.kind().entity_kind());
        let kind = node.kind();
        ops::add_node(&mut self.diagram, node_id.clone(), node)?;
        debug!(node_id:% = node_id, kind:% = kind; "node created");
        self.commit();
        Ok(node_id)
    }

    pub fn update_node(&mut self, node_id: &str, patch: NodePatch) -> Result<(), EditError> {
        ops::update_node(&mut self.diagram, node_id, patch)?;
        debug!(node_id = node_id; "node updated");
        self.commit();
        Ok(())
    }

    /// Removes the node and its edges. Children keep their (now dangling) parent pointers.
    pub fn delete_node(&mut self, node_id: &str) -> Result<(), EditError> {
        let removed_edges = ops::delete_node(&mut self.diagram, node_id)?;
        debug!(node_id = node_id, removed_edges = removed_edges.len(); "node deleted");

        if self.selected_node_id.as_ref().is_some_and(|id| id.as_str() == node_id) {
            self.selected_node_id = None;
        }
        if self
            .selected_edge_id
            .as_ref()
            .is_some_and(|edge_id| removed_edges.contains(edge_id))
        {
            self.selected_edge_id = None;
        }
        self.connection.forget_node(node_id);

        self.commit();
        Ok(())
    }

    pub fn add_edge(&mut self, edge_id: EdgeId, edge: Edge) -> Result<(), EditError> {
        let (from, to) = (edge.from().clone(), edge.to().clone());
        ops::add_edge(&mut self.diagram, edge_id.clone(), edge)?;
        debug!(edge_id:% = edge_id, from:% = from, to:% = to; "edge added");
        self.commit();
        Ok(())
    }

    pub fn update_edge(&mut self, edge_id: &str, patch: EdgePatch) -> Result<(), EditError> {
        ops::update_edge(&mut self.diagram, edge_id, patch)?;
        debug!(edge_id = edge_id; "edge updated");
        self.commit();
        Ok(())
    }

    pub fn delete_edge(&mut self, edge_id: &str) -> Result<(), EditError> {
        ops::delete_edge(&mut self.diagram, edge_id)?;
        debug!(edge_id = edge_id; "edge deleted");
        if self.selected_edge_id.as_ref().is_some_and(|id| id.as_str() == edge_id) {
            self.selected_edge_id = None;
        }
        self.commit();
        Ok(())
    }

    /// Moves an action into a block (leaving any previous block) and expands the block.
    pub fn nest_action_in_block(
        &mut self,
        action_id: &str,
        block_id: &str,
    ) -> Result<(), EditError> {
        let previous = ops::nest_action_in_block(&mut self.diagram, action_id, block_id)?;
        debug!(
            action_id = action_id,
            block_id = block_id,
            previous:? = previous.as_ref().map(NodeId::as_str);
            "action nested"
        );
        self.commit();
        Ok(())
    }

    pub fn remove_action_from_block(&mut self, action_id: &str) -> Result<(), EditError> {
        let previous = ops::remove_action_from_block(&mut self.diagram, action_id)?;
        debug!(
            action_id = action_id,
            previous:? = previous.as_ref().map(NodeId::as_str);
            "action unnested"
        );
        self.commit();
        Ok(())
    }

    pub fn selected_node_id(&self) -> Option<&NodeId> {
        self.selected_node_id.as_ref()
    }

    pub fn selected_edge_id(&self) -> Option<&EdgeId> {
        self.selected_edge_id.as_ref()
    }

    /// Selects a node (clearing any edge selection), or clears the node selection.
    ///
    /// Unknown ids are ignored.
    pub fn set_selected_node(&mut self, node_id: Option<&str>) {
        let Some(node_id) = node_id else {
            self.selected_node_id = None;
            return;
        };
        let Some(node_id) = self.resolve_node_id(node_id) else {
            debug!(node_id = node_id; "select ignored: unknown node");
            return;
        };
        self.selected_node_id = Some(node_id);
        self.selected_edge_id = None;
    }

    /// Selects an edge (clearing any node selection), or clears the edge selection.
    ///
    /// Unknown ids are ignored.
    pub fn set_selected_edge(&mut self, edge_id: Option<&str>) {
        let Some(edge_id) = edge_id else {
            self.selected_edge_id = None;
            return;
        };
        let Some((edge_id, _)) = self.diagram.edges().get_key_value(edge_id) else {
            debug!(edge_id = edge_id; "select ignored: unknown edge");
            return;
        };
        self.selected_edge_id = Some(edge_id.clone());
        self.selected_node_id = None;
    }

    fn resolve_node_id(&self, node_id: &str) -> Option<NodeId> {
        self.diagram.nodes().get_key_value(node_id).map(|(id, _)| id.clone())
    }

    pub fn export_json(&self) -> Result<String, FormatError> {
        export_document(&self.diagram)
    }

    /// Replaces the whole model with the parsed document.
    ///
    /// On error nothing changes. On success selection and any gesture in progress are reset.
    pub fn import_json(&mut self, input: &str) -> Result<(), FormatError> {
        let diagram = import_document(input)?;
        self.replace_diagram(diagram);
        Ok(())
    }

    /// Replaces the whole model, e.g. with one of the built-in samples.
    pub fn replace_diagram(&mut self, diagram: Diagram) {
        self.diagram = diagram;
        self.selected_node_id = None;
        self.selected_edge_id = None;
        self.connection = ConnectionState::Idle;
        debug!(
            nodes = self.diagram.nodes().len(),
            edges = self.diagram.edges().len();
            "diagram replaced"
        );
        self.commit();
    }
}
