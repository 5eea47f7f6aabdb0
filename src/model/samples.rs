// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in demo journeys.

use super::diagram::Diagram;
use super::edge::{Edge, EdgeKind};
use super::ids::{EdgeId, Id, NodeId};
use super::node::{Action, Block, Node, Phase, Position};

// Literal ids below are all non-empty.
fn id<T>(value: &str) -> Id<T> {
    match Id::new(value) {
        Ok(id) => id,
        Err(err) => unreachable!("sample id {value:?} is invalid: {err}"),
    }
}

fn block(label: &str, phase: &str) -> Node {
    let mut block = Block::new(label, id(phase));
    block.set_expanded(true);
    block.into()
}

fn action(label: &str, parent: Option<&str>, actor: &str, position: Position) -> Node {
    let mut action = Action::new_with(label, parent.map(id), vec![actor.to_owned()]);
    action.set_position(Some(position));
    action.into()
}

fn edge(from: &str, to: &str, kind: EdgeKind, descriptor: Option<&str>) -> Edge {
    Edge::new_with(id(from), id(to), kind, descriptor.map(ToOwned::to_owned))
}

/// Two phases, two blocks, one orphaned action, and a parallel block edge.
pub fn sample_diagram() -> Diagram {
    let mut diagram = Diagram::new();
    let origin = Position::default();

    let nodes: [(&str, Node); 8] = [
        ("phaseA", Phase::new("Phase A").into()),
        ("phaseB", Phase::new("Phase B").into()),
        ("block1", block("User Block", "phaseA")),
        ("block2", block("System Block", "phaseB")),
        ("action1", action("User initiates request", Some("block1"), "user", origin)),
        ("action2", action("Info validated", Some("block1"), "admin", origin)),
        ("action3", action("System processes", Some("block2"), "system", origin)),
        ("actionOrphan", action("Unassigned action", None, "user", origin)),
    ];
    for (node_id, node) in nodes {
        let node_id: NodeId = id(node_id);
        diagram.insert_node(node_id, node);
    }

    let edges = [
        ("e1", edge("action1", "action2", EdgeKind::Any, None)),
        ("e2", edge("action2", "action3", EdgeKind::Any, None)),
        ("e3", edge("block1", "block2", EdgeKind::Parallel, Some("Runs in parallel"))),
    ];
    for (edge_id, edge) in edges {
        let edge_id: EdgeId = id(edge_id);
        diagram.insert_edge(edge_id, edge);
    }

    diagram
}

/// A login journey where validation branches into success and error paths.
pub fn sample_diagram_with_branching() -> Diagram {
    let mut diagram = Diagram::new();

    let nodes: [(&str, Node); 8] = [
        ("phase1", Phase::new("User Authentication Phase").into()),
        ("block1", block("Login Process", "phase1")),
        (
            "action1",
            action("User enters credentials", Some("block1"), "user", Position::new(0.0, 0.0)),
        ),
        (
            "action2",
            action("Validate credentials", Some("block1"), "system", Position::new(200.0, 0.0)),
        ),
        (
            "action3",
            action("Show error message", Some("block1"), "system", Position::new(400.0, 0.0)),
        ),
        ("block2", block("Success Flow", "phase1")),
        (
            "action4",
            action("Redirect to dashboard", Some("block2"), "system", Position::new(0.0, 0.0)),
        ),
        ("orphan1", action("Orphaned Action", None, "user", Position::new(100.0, 300.0))),
    ];
    for (node_id, node) in nodes {
        let node_id: NodeId = id(node_id);
        diagram.insert_node(node_id, node);
    }

    let edges = [
        ("edge1", edge("action1", "action2", EdgeKind::Any, None)),
        ("edge2", edge("action2", "action4", EdgeKind::Choice, Some("valid"))),
        ("edge3", edge("action2", "action3", EdgeKind::Choice, Some("invalid"))),
        ("edge4", edge("block1", "block2", EdgeKind::Any, None)),
    ];
    for (edge_id, edge) in edges {
        let edge_id: EdgeId = id(edge_id);
        diagram.insert_edge(edge_id, edge);
    }

    diagram
}
