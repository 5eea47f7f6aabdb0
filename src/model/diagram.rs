// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;

use super::edge::Edge;
use super::ids::{EdgeId, NodeId};
use super::node::{Node, NodeKind};

/// The service journey model: nodes and edges in insertion order.
///
/// Ids are unique across both collections. The only public mutation entry point is
/// [`DiagramStore`](crate::store::DiagramStore); the crate-level mutators below assume the
/// caller already checked ids and kinds.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
}

impl PartialEq for Diagram {
    // Order-sensitive: export order is part of the document.
    fn eq(&self, other: &Self) -> bool {
        self.nodes.iter().eq(other.nodes.iter()) && self.edges.iter().eq(other.edges.iter())
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &IndexMap<NodeId, Node> {
        &self.nodes
    }

    pub fn edges(&self) -> &IndexMap<EdgeId, Edge> {
        &self.edges
    }

    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    pub fn node_kind(&self, node_id: &str) -> Option<NodeKind> {
        self.node(node_id).map(Node::kind)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Whether any node or edge already uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.nodes.contains_key(id) || self.edges.contains_key(id)
    }

    pub fn nodes_by_kind(&self, kind: NodeKind) -> impl Iterator<Item = (&NodeId, &Node)> + '_ {
        self.nodes.iter().filter(move |(_, node)| node.kind() == kind)
    }

    /// Actions whose parent pointer names `block_id`, in node order.
    ///
    /// This is the block's child list; it is derived rather than stored so the parent pointer
    /// and the child list cannot disagree.
    pub fn child_actions(&self, block_id: &NodeId) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| {
                node.as_action().and_then(|action| action.parent_block()) == Some(block_id)
            })
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Blocks of a phase, or actions of a block, in node order.
    pub fn child_nodes(&self, parent_id: &NodeId) -> Vec<(&NodeId, &Node)> {
        self.nodes
            .iter()
            .filter(|(_, node)| match node {
                Node::Phase(_) => false,
                Node::Block(block) => block.parent_phase() == parent_id,
                Node::Action(action) => action.parent_block() == Some(parent_id),
            })
            .collect()
    }

    /// Blocks whose parent pointer names `phase_id`, in node order.
    pub fn phase_blocks(&self, phase_id: &NodeId) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.as_block().map(|block| block.parent_phase()) == Some(phase_id))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    pub fn edges_touching<'a>(
        &'a self,
        node_id: &'a NodeId,
    ) -> impl Iterator<Item = (&'a EdgeId, &'a Edge)> + 'a {
        self.edges.iter().filter(move |(_, edge)| edge.touches(node_id))
    }

    pub fn has_edge_between(&self, from: &str, to: &str) -> bool {
        self.edges.values().any(|edge| edge.from().as_str() == from && edge.to().as_str() == to)
    }

    pub(crate) fn node_mut(&mut self, node_id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub(crate) fn edge_mut(&mut self, edge_id: &str) -> Option<&mut Edge> {
        self.edges.get_mut(edge_id)
    }

    pub(crate) fn insert_node(&mut self, node_id: NodeId, node: Node) {
        debug_assert!(!self.contains_id(node_id.as_str()), "node id checked by caller");
        self.nodes.insert(node_id, node);
    }

    pub(crate) fn insert_edge(&mut self, edge_id: EdgeId, edge: Edge) {
        debug_assert!(!self.contains_id(edge_id.as_str()), "edge id checked by caller");
        self.edges.insert(edge_id, edge);
    }

    /// Removes a node and every edge that starts or ends at it.
    ///
    /// Children are left in place: their parent pointers dangle until validation reports them.
    pub(crate) fn remove_node(&mut self, node_id: &str) -> Option<(Node, Vec<EdgeId>)> {
        let node = self.nodes.shift_remove(node_id)?;
        let mut removed_edges = Vec::new();
        self.edges.retain(|edge_id, edge| {
            let touches = edge.from().as_str() == node_id || edge.to().as_str() == node_id;
            if touches {
                removed_edges.push(edge_id.clone());
            }
            !touches
        });
        Some((node, removed_edges))
    }

    pub(crate) fn remove_edge(&mut self, edge_id: &str) -> Option<Edge> {
        self.edges.shift_remove(edge_id)
    }

    /// Points `action_id` at `block_id` and marks the block expanded.
    ///
    /// Both ids must already resolve to an action and a block respectively.
    pub(crate) fn nest_action(&mut self, action_id: &str, block_id: &NodeId) {
        if let Some(Node::Action(action)) = self.nodes.get_mut(action_id) {
            action.set_parent_block(Some(block_id.clone()));
        }
        if let Some(Node::Block(block)) = self.nodes.get_mut(block_id.as_str()) {
            block.set_expanded(true);
        }
    }

    /// Clears the action's parent pointer; returns the block it was nested in.
    pub(crate) fn unnest_action(&mut self, action_id: &str) -> Option<NodeId> {
        match self.nodes.get_mut(action_id) {
            Some(Node::Action(action)) => {
                let previous = action.parent_block().cloned();
                action.set_parent_block(None);
                previous
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Diagram;
    use crate::model::{Action, Block, Edge, EdgeId, Node, NodeId, NodeKind, Phase};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn eid(value: &str) -> EdgeId {
        EdgeId::new(value).expect("edge id")
    }

    fn small_diagram() -> Diagram {
        let mut diagram = Diagram::new();
        diagram.insert_node(nid("p1"), Phase::new("P").into());
        diagram.insert_node(nid("b1"), Block::new("B1", nid("p1")).into());
        diagram.insert_node(nid("b2"), Block::new("B2", nid("p1")).into());
        diagram.insert_node(nid("a1"), Action::new_with("A1", Some(nid("b1")), vec![]).into());
        diagram.insert_node(nid("a2"), Action::new("A2").into());
        diagram.insert_edge(eid("e1"), Edge::new(nid("a1"), nid("a2")));
        diagram.insert_edge(eid("e2"), Edge::new(nid("b1"), nid("b2")));
        diagram
    }

    #[test]
    fn ids_are_unique_across_nodes_and_edges() {
        let diagram = small_diagram();
        assert!(diagram.contains_id("p1"));
        assert!(diagram.contains_id("e2"));
        assert!(!diagram.contains_id("e3"));
    }

    #[test]
    fn child_actions_are_derived_from_parent_pointers() {
        let mut diagram = small_diagram();
        assert_eq!(diagram.child_actions(&nid("b1")), vec![&nid("a1")]);
        assert!(diagram.child_actions(&nid("b2")).is_empty());

        diagram.nest_action("a2", &nid("b1"));
        assert_eq!(diagram.child_actions(&nid("b1")), vec![&nid("a1"), &nid("a2")]);
        let Some(Node::Block(block)) = diagram.node("b1") else {
            panic!("expected block");
        };
        assert!(block.expanded());

        assert_eq!(diagram.unnest_action("a1"), Some(nid("b1")));
        assert_eq!(diagram.child_actions(&nid("b1")), vec![&nid("a2")]);
    }

    #[test]
    fn child_nodes_cover_both_nesting_levels() {
        let diagram = small_diagram();
        let phase_children =
            diagram.child_nodes(&nid("p1")).into_iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>();
        assert_eq!(phase_children, vec!["b1", "b2"]);
        assert_eq!(diagram.phase_blocks(&nid("p1")).len(), 2);

        let block_children = diagram.child_nodes(&nid("b1"));
        assert_eq!(block_children.len(), 1);
        assert_eq!(block_children[0].1.kind(), NodeKind::Action);
        assert!(diagram.child_nodes(&nid("a1")).is_empty());
    }

    #[test]
    fn remove_node_cascades_edges_but_not_children() {
        let mut diagram = small_diagram();
        let (node, removed_edges) = diagram.remove_node("b1").expect("b1 exists");
        assert_eq!(node.kind(), NodeKind::Block);
        assert_eq!(removed_edges, vec![eid("e2")]);

        // a1 still points at the deleted block.
        let action = diagram.node("a1").and_then(Node::as_action).expect("a1");
        assert_eq!(action.parent_block(), Some(&nid("b1")));
        assert!(diagram.edge("e1").is_some());
        assert!(diagram.remove_node("b1").is_none());
    }

    #[test]
    fn equality_is_order_sensitive() {
        let mut left = Diagram::new();
        left.insert_node(nid("p1"), Phase::new("P1").into());
        left.insert_node(nid("p2"), Phase::new("P2").into());

        let mut right = Diagram::new();
        right.insert_node(nid("p2"), Phase::new("P2").into());
        right.insert_node(nid("p1"), Phase::new("P1").into());

        assert_ne!(left, right);
        assert_eq!(left, left.clone());
    }

    #[test]
    fn has_edge_between_respects_direction() {
        let diagram = small_diagram();
        assert!(diagram.has_edge_between("a1", "a2"));
        assert!(!diagram.has_edge_between("a2", "a1"));
        assert_eq!(diagram.edges_touching(&nid("a2")).count(), 1);
        assert_eq!(diagram.nodes_by_kind(NodeKind::Block).count(), 2);
    }
}
