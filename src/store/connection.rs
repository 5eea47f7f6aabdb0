// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The connection gesture: pick a source node, then a target, to draw an edge.
//!
//! Rejected gestures never surface an error. They reset to [`ConnectionState::Idle`] (or stay
//! put, for clicks on invalid targets) and log at debug level.

use log::debug;

use crate::model::{Edge, EdgeId, EdgeKind, EntityKind, NodeId};
use crate::ops::{self, ConnectError};

use super::DiagramStore;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting {
        source: NodeId,
        /// Display hint only.
        hovered: Option<NodeId>,
    },
}

impl ConnectionState {
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting { .. })
    }

    pub fn source(&self) -> Option<&NodeId> {
        match self {
            Self::Idle => None,
            Self::Connecting { source, .. } => Some(source),
        }
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        match self {
            Self::Idle => None,
            Self::Connecting { hovered, .. } => hovered.as_ref(),
        }
    }

    /// Drops references to a node that no longer exists.
    pub(super) fn forget_node(&mut self, node_id: &str) {
        if self.source().is_some_and(|source| source.as_str() == node_id) {
            *self = Self::Idle;
            return;
        }
        if let Self::Connecting { hovered, .. } = self {
            if hovered.as_ref().is_some_and(|hovered| hovered.as_str() == node_id) {
                *hovered = None;
            }
        }
    }
}

/// What a click on a node did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeClick {
    Selected,
    /// The gesture source was clicked again.
    Cancelled,
    Connected(EdgeId),
    /// Invalid target while connecting; the gesture continues.
    Ignored,
}

impl DiagramStore {
    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn is_connecting(&self) -> bool {
        self.connection.is_connecting()
    }

    /// Whether an edge `source -> target` would be accepted.
    pub fn can_connect(&self, source: &str, target: &str) -> bool {
        self.check_connection(source, target).is_ok()
    }

    /// Like [`Self::can_connect`], with the reason for a rejection.
    pub fn check_connection(&self, source: &str, target: &str) -> Result<(), ConnectError> {
        ops::check_connection(&self.diagram, source, target)
    }

    /// Begins a gesture at `node_id`.
    ///
    /// Ignored while a gesture is already running, or when the node is unknown or cannot be an
    /// edge endpoint.
    pub fn start_connection(&mut self, node_id: &str) {
        if let ConnectionState::Connecting { source, .. } = &self.connection {
            debug!(source:% = source, node_id = node_id; "start ignored: already connecting");
            return;
        }
        let Some((source, node)) = self.diagram.nodes().get_key_value(node_id) else {
            debug!(node_id = node_id; "start ignored: unknown node");
            return;
        };
        if !node.kind().is_edge_endpoint() {
            debug!(node_id = node_id, kind:% = node.kind(); "start ignored: not an endpoint");
            return;
        }
        self.connection = ConnectionState::Connecting { source: source.clone(), hovered: None };
        debug!(source = node_id; "connection started");
    }

    /// Updates the hover hint. Unknown ids clear it. No effect while idle.
    pub fn set_hovered_node(&mut self, node_id: Option<&str>) {
        let resolved = node_id.and_then(|node_id| self.resolve_node_id(node_id));
        if let ConnectionState::Connecting { hovered, .. } = &mut self.connection {
            *hovered = resolved;
        }
    }

    pub fn cancel_connection(&mut self) {
        if let ConnectionState::Connecting { source, .. } = &self.connection {
            debug!(source:% = source; "connection cancelled");
        }
        self.connection = ConnectionState::Idle;
    }

    /// Finishes the gesture at `target`. The gesture always ends.
    ///
    /// Returns the new edge id, or `None` when the connection is not allowed (or nothing was
    /// in progress). `kind` falls back to [`StoreOptions::default_edge_kind`](super::StoreOptions).
    pub fn complete_connection(
        &mut self,
        target: &str,
        kind: Option<EdgeKind>,
        descriptor: Option<String>,
    ) -> Option<EdgeId> {
        let ConnectionState::Connecting { source, .. } = std::mem::take(&mut self.connection)
        else {
            debug!(target = target; "complete ignored: not connecting");
            return None;
        };

        if let Err(reason) = self.check_connection(source.as_str(), target) {
            debug!(source:% = source, target = target, reason:% = reason; "connection declined");
            return None;
        }
        let target = self.resolve_node_id(target)?;

        let edge_id: EdgeId = self.fresh_id(EntityKind::Edge);
        let kind = kind.unwrap_or(self.options.default_edge_kind);
        debug!(
            edge_id:% = edge_id,
            source:% = source,
            target:% = target,
            kind:% = kind;
            "connection completed"
        );
        let edge = Edge::new_with(source, target, kind, descriptor);
        self.diagram.insert_edge(edge_id.clone(), edge);
        self.commit();
        Some(edge_id)
    }

    /// Canvas click on a node.
    ///
    /// Idle: selects the node. Connecting: the source cancels, a valid target completes with the
    /// default edge type, anything else is ignored and the gesture continues.
    pub fn click_node(&mut self, node_id: &str) -> NodeClick {
        let Some(source) = self.connection.source() else {
            self.set_selected_node(Some(node_id));
            return NodeClick::Selected;
        };

        if source.as_str() == node_id {
            self.cancel_connection();
            return NodeClick::Cancelled;
        }
        if !self.can_connect(source.as_str(), node_id) {
            debug!(source:% = source, target = node_id; "click ignored: invalid target");
            return NodeClick::Ignored;
        }
        match self.complete_connection(node_id, None, None) {
            Some(edge_id) => NodeClick::Connected(edge_id),
            None => NodeClick::Ignored,
        }
    }

    /// Canvas click on empty space: cancels a running gesture, otherwise clears the node
    /// selection.
    pub fn click_pane(&mut self) {
        if self.connection.is_connecting() {
            self.cancel_connection();
        } else {
            self.set_selected_node(None);
        }
    }

    /// Nodes the current gesture could end on, in node order. Empty while idle.
    pub fn valid_targets(&self) -> Vec<&NodeId> {
        let Some(source) = self.connection.source() else {
            return Vec::new();
        };
        self.diagram
            .nodes()
            .keys()
            .filter(|node_id| self.can_connect(source.as_str(), node_id.as_str()))
            .collect()
    }
}
