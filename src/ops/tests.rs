// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use crate::model::{
    Action, Block, Diagram, Edge, EdgeId, EdgeKind, Node, NodeId, NodeKind, Phase, Position,
};

use super::{
    add_edge, add_node, check_connection, delete_edge, delete_node, nest_action_in_block,
    remove_action_from_block, update_edge, update_node, ActionPatch, BlockPatch, ConnectError,
    EdgePatch, EditError, PhasePatch,
};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn eid(value: &str) -> EdgeId {
    EdgeId::new(value).expect("edge id")
}

fn action<'a>(diagram: &'a Diagram, node_id: &str) -> &'a Action {
    diagram.node(node_id).and_then(Node::as_action).expect("action")
}

#[fixture]
fn diagram() -> Diagram {
    let mut diagram = Diagram::new();
    add_node(&mut diagram, nid("p1"), Phase::new("Discover").into()).expect("p1");
    add_node(&mut diagram, nid("b1"), Block::new("Browse", nid("p1")).into()).expect("b1");
    add_node(&mut diagram, nid("b2"), Block::new("Compare", nid("p1")).into()).expect("b2");
    add_node(&mut diagram, nid("a1"), Action::new_with("Open app", Some(nid("b1")), vec![]).into())
        .expect("a1");
    add_node(&mut diagram, nid("a2"), Action::new("Search").into()).expect("a2");
    add_edge(&mut diagram, eid("e1"), Edge::new(nid("a1"), nid("a2"))).expect("e1");
    diagram
}

#[rstest]
fn add_node_rejects_ids_used_by_nodes_or_edges(mut diagram: Diagram) {
    let before = diagram.clone();
    assert_eq!(
        add_node(&mut diagram, nid("p1"), Phase::new("again").into()),
        Err(EditError::DuplicateId { id: "p1".to_owned() })
    );
    assert_eq!(
        add_node(&mut diagram, nid("e1"), Phase::new("edge id").into()),
        Err(EditError::DuplicateId { id: "e1".to_owned() })
    );
    assert_eq!(diagram, before);
}

#[rstest]
fn update_node_applies_only_present_fields(mut diagram: Diagram) {
    update_node(
        &mut diagram,
        "b1",
        BlockPatch { expanded: Some(true), ..BlockPatch::default() }.into(),
    )
    .expect("update block");
    let block = diagram.node("b1").and_then(Node::as_block).expect("block");
    assert!(block.expanded());
    assert_eq!(block.label(), "Browse");

    update_node(
        &mut diagram,
        "a1",
        ActionPatch {
            performed_by: Some(vec!["user".to_owned()]),
            position: Some(Some(Position::new(10.0, 20.0))),
            ..ActionPatch::default()
        }
        .into(),
    )
    .expect("update action");
    let a1 = action(&diagram, "a1");
    assert_eq!(a1.performed_by(), ["user".to_owned()]);
    assert_eq!(a1.position(), Some(Position::new(10.0, 20.0)));
    assert_eq!(a1.parent_block(), Some(&nid("b1")));

    update_node(
        &mut diagram,
        "a1",
        ActionPatch { position: Some(None), ..ActionPatch::default() }.into(),
    )
    .expect("clear position");
    assert_eq!(action(&diagram, "a1").position(), None);
}

#[rstest]
#[case(Position::new(f64::INFINITY, 0.0))]
#[case(Position::new(0.0, f64::NEG_INFINITY))]
#[case(Position::new(f64::NAN, 1.0))]
fn non_finite_positions_are_rejected(mut diagram: Diagram, #[case] position: Position) {
    let before = diagram.clone();
    let err = update_node(
        &mut diagram,
        "a1",
        ActionPatch {
            label: Some("Moved".to_owned()),
            position: Some(Some(position)),
            ..ActionPatch::default()
        }
        .into(),
    )
    .unwrap_err();
    assert_eq!(err, EditError::NonFinitePosition { node_id: "a1".to_owned() });
    assert_eq!(diagram, before);

    let mut placed = Action::new("Placed");
    placed.set_position(Some(position));
    let err = add_node(&mut diagram, nid("a9"), placed.into()).unwrap_err();
    assert_eq!(err, EditError::NonFinitePosition { node_id: "a9".to_owned() });
    assert!(diagram.node("a9").is_none());
}

#[rstest]
fn update_node_rejects_patch_for_other_variant(mut diagram: Diagram) {
    let before = diagram.clone();
    let err = update_node(
        &mut diagram,
        "p1",
        BlockPatch { label: Some("nope".to_owned()), ..BlockPatch::default() }.into(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        EditError::KindMismatch {
            node_id: "p1".to_owned(),
            expected: NodeKind::Block,
            found: NodeKind::Phase,
        }
    );
    assert_eq!(diagram, before);

    assert_eq!(
        update_node(&mut diagram, "missing", PhasePatch::default().into()),
        Err(EditError::NodeNotFound { node_id: "missing".to_owned() })
    );
}

#[rstest]
fn delete_node_cascades_edges_and_orphans_children(mut diagram: Diagram) {
    let removed = delete_node(&mut diagram, "b1").expect("delete");
    assert!(removed.is_empty());
    // a1 keeps its pointer at the removed block.
    assert_eq!(action(&diagram, "a1").parent_block(), Some(&nid("b1")));

    let removed = delete_node(&mut diagram, "a2").expect("delete");
    assert_eq!(removed, vec![eid("e1")]);
    assert!(diagram.edges().is_empty());

    assert_eq!(
        delete_node(&mut diagram, "a2"),
        Err(EditError::NodeNotFound { node_id: "a2".to_owned() })
    );
}

#[rstest]
#[case("a1", "ghost", ConnectError::UnknownNode { node_id: "ghost".to_owned() })]
#[case("a1", "a1", ConnectError::SelfLoop { node_id: "a1".to_owned() })]
#[case("a1", "a2", ConnectError::Duplicate { from: "a1".to_owned(), to: "a2".to_owned() })]
#[case("p1", "a1", ConnectError::InvalidEndpoint { node_id: "p1".to_owned(), kind: NodeKind::Phase })]
#[case("b1", "p1", ConnectError::InvalidEndpoint { node_id: "p1".to_owned(), kind: NodeKind::Phase })]
fn check_connection_rejects(
    diagram: Diagram,
    #[case] from: &str,
    #[case] to: &str,
    #[case] expected: ConnectError,
) {
    assert_eq!(check_connection(&diagram, from, to), Err(expected));
}

#[rstest]
#[case("a2", "a1")]
#[case("b1", "b2")]
#[case("a1", "b2")]
#[case("b2", "a2")]
fn check_connection_allows_blocks_and_actions_in_any_direction(
    diagram: Diagram,
    #[case] from: &str,
    #[case] to: &str,
) {
    assert_eq!(check_connection(&diagram, from, to), Ok(()));
}

#[rstest]
fn add_edge_enforces_connection_policy(mut diagram: Diagram) {
    let before = diagram.clone();
    let err = add_edge(&mut diagram, eid("e2"), Edge::new(nid("a1"), nid("a2"))).unwrap_err();
    assert!(matches!(err, EditError::InvalidEdge(ConnectError::Duplicate { .. })));
    let err = add_edge(&mut diagram, eid("a1"), Edge::new(nid("a2"), nid("a1"))).unwrap_err();
    assert_eq!(err, EditError::DuplicateId { id: "a1".to_owned() });
    assert_eq!(diagram, before);

    add_edge(
        &mut diagram,
        eid("e2"),
        Edge::new_with(nid("a2"), nid("a1"), EdgeKind::Choice, Some("retry".to_owned())),
    )
    .expect("reverse edge");
    assert_eq!(diagram.edges().len(), 2);
}

#[rstest]
fn update_edge_changes_kind_and_descriptor(mut diagram: Diagram) {
    update_edge(
        &mut diagram,
        "e1",
        EdgePatch { kind: Some(EdgeKind::Parallel), descriptor: Some(Some("both".to_owned())) },
    )
    .expect("update");
    let edge = diagram.edge("e1").expect("edge");
    assert_eq!(edge.kind(), EdgeKind::Parallel);
    assert_eq!(edge.descriptor(), Some("both"));

    update_edge(&mut diagram, "e1", EdgePatch { kind: None, descriptor: Some(None) })
        .expect("clear descriptor");
    let edge = diagram.edge("e1").expect("edge");
    assert_eq!(edge.kind(), EdgeKind::Parallel);
    assert_eq!(edge.descriptor(), None);

    assert_eq!(
        update_edge(&mut diagram, "e9", EdgePatch::default()),
        Err(EditError::EdgeNotFound { edge_id: "e9".to_owned() })
    );
}

#[rstest]
fn delete_edge_returns_removed_edge(mut diagram: Diagram) {
    let edge = delete_edge(&mut diagram, "e1").expect("delete");
    assert_eq!(edge.from(), &nid("a1"));
    assert!(diagram.edges().is_empty());
    assert!(matches!(delete_edge(&mut diagram, "e1"), Err(EditError::EdgeNotFound { .. })));
}

#[rstest]
fn nesting_moves_action_between_blocks(mut diagram: Diagram) {
    let previous = nest_action_in_block(&mut diagram, "a1", "b2").expect("nest");
    assert_eq!(previous, Some(nid("b1")));
    assert!(diagram.child_actions(&nid("b1")).is_empty());
    assert_eq!(diagram.child_actions(&nid("b2")), vec![&nid("a1")]);
    assert!(diagram.node("b2").and_then(Node::as_block).expect("block").expanded());
}

#[rstest]
fn nesting_twice_is_idempotent(mut diagram: Diagram) {
    nest_action_in_block(&mut diagram, "a2", "b1").expect("nest");
    let once = diagram.clone();
    nest_action_in_block(&mut diagram, "a2", "b1").expect("nest again");
    assert_eq!(diagram, once);
    assert_eq!(diagram.child_actions(&nid("b1")), vec![&nid("a1"), &nid("a2")]);
}

#[rstest]
fn nesting_checks_both_kinds(mut diagram: Diagram) {
    let before = diagram.clone();
    assert_eq!(
        nest_action_in_block(&mut diagram, "b1", "b2"),
        Err(EditError::KindMismatch {
            node_id: "b1".to_owned(),
            expected: NodeKind::Action,
            found: NodeKind::Block,
        })
    );
    assert_eq!(
        nest_action_in_block(&mut diagram, "a1", "p1"),
        Err(EditError::KindMismatch {
            node_id: "p1".to_owned(),
            expected: NodeKind::Block,
            found: NodeKind::Phase,
        })
    );
    assert!(matches!(
        nest_action_in_block(&mut diagram, "a1", "nowhere"),
        Err(EditError::NodeNotFound { .. })
    ));
    assert_eq!(diagram, before);
}

#[rstest]
fn removing_from_block_orphans_the_action(mut diagram: Diagram) {
    assert_eq!(remove_action_from_block(&mut diagram, "a1"), Ok(Some(nid("b1"))));
    assert!(action(&diagram, "a1").is_orphaned());
    assert!(diagram.child_actions(&nid("b1")).is_empty());
    assert_eq!(remove_action_from_block(&mut diagram, "a1"), Ok(None));
}
