// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Servicemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Servicemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::format::json::{node_to_json, EdgeTypeJson, NodeJson, PositionJson};
use crate::model::{Diagram, Node, NodeId};

const PHASE_SIZE: (f64, f64) = (250.0, 100.0);
const ACTION_SIZE: (f64, f64) = (200.0, 80.0);
const BLOCK_MIN_WIDTH: f64 = 300.0;
const BLOCK_HEIGHT: f64 = 80.0;
const BLOCK_EXPANDED_HEIGHT: f64 = 120.0;
const NESTED_ACTION_WIDTH: f64 = 150.0;
const NESTED_ACTION_GAP: f64 = 20.0;
const BLOCK_PADDING: f64 = 40.0;

/// Spacing between nodes of one rank (`node_sep`) and between ranks (`rank_sep`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_sep: f64,
    pub rank_sep: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { node_sep: 50.0, rank_sep: 100.0 }
    }
}

/// A positioned node: the exported node fields, with `position` replaced by the computed
/// top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    #[serde(flatten)]
    node: NodeJson,
    width: f64,
    height: f64,
}

impl LayoutNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn position(&self) -> (f64, f64) {
        self.node.position.map(|position| (position.x, position.y)).unwrap_or_default()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn node(&self) -> &NodeJson {
        &self.node
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeTypeJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramLayout {
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    /// Rank of every node, in node order.
    #[serde(skip)]
    ranks: Vec<usize>,
}

impl DiagramLayout {
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn node(&self, node_id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id() == node_id)
    }

    pub fn rank(&self, node_id: &str) -> Option<usize> {
        let index = self.nodes.iter().position(|node| node.id() == node_id)?;
        self.ranks.get(index).copied()
    }
}

fn node_size(diagram: &Diagram, node_id: &NodeId, node: &Node) -> (f64, f64) {
    match node {
        Node::Phase(_) => PHASE_SIZE,
        Node::Action(_) => ACTION_SIZE,
        Node::Block(block) => {
            let children = diagram.child_actions(node_id).len();
            if children == 0 {
                return (BLOCK_MIN_WIDTH, BLOCK_HEIGHT);
            }
            let width = children as f64 * (NESTED_ACTION_WIDTH + NESTED_ACTION_GAP) + BLOCK_PADDING;
            let height = if block.expanded() { BLOCK_EXPANDED_HEIGHT } else { BLOCK_HEIGHT };
            (width.max(BLOCK_MIN_WIDTH), height)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Reverses every edge that closes a cycle, found by a DFS in node order.
///
/// The result is acyclic; edge order is preserved.
fn break_cycles(node_count: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut outgoing = vec![Vec::new(); node_count];
    for (edge_idx, &(from, to)) in edges.iter().enumerate() {
        outgoing[from].push((to, edge_idx));
    }

    let mut visits = vec![Visit::New; node_count];
    let mut back_edge = vec![false; edges.len()];
    for root in 0..node_count {
        if visits[root] != Visit::New {
            continue;
        }
        visits[root] = Visit::Active;
        let mut stack = vec![(root, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&(to, edge_idx)) = outgoing[node].get(cursor) else {
                visits[node] = Visit::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;
            match visits[to] {
                Visit::New => {
                    visits[to] = Visit::Active;
                    stack.push((to, 0));
                }
                Visit::Active => back_edge[edge_idx] = true,
                Visit::Done => {}
            }
        }
    }

    edges
        .iter()
        .zip(back_edge)
        .map(|(&(from, to), reversed)| if reversed { (to, from) } else { (from, to) })
        .collect()
}

/// Longest-path ranks over a DAG; ready nodes are taken in node order.
fn assign_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut indegree = vec![0usize; node_count];
    let mut outgoing = vec![Vec::new(); node_count];
    for &(from, to) in edges {
        outgoing[from].push(to);
        indegree[to] += 1;
    }

    let mut ranks = vec![0usize; node_count];
    let mut ready = (0..node_count).filter(|&idx| indegree[idx] == 0).collect::<BTreeSet<_>>();
    while let Some(next) = ready.pop_first() {
        for &to in &outgoing[next] {
            ranks[to] = ranks[to].max(ranks[next] + 1);
            indegree[to] -= 1;
            if indegree[to] == 0 {
                ready.insert(to);
            }
        }
    }
    ranks
}

fn barycenter(predecessors: &[usize], prev_positions: &[Option<usize>]) -> Option<(usize, usize)> {
    let (sum, count) = predecessors
        .iter()
        .filter_map(|&pred| prev_positions[pred])
        .fold((0usize, 0usize), |(sum, count), pos| (sum + pos, count + 1));
    (count > 0).then_some((sum, count))
}

fn sort_rank_by_barycenter(
    rank_nodes: &mut [usize],
    prev_positions: &[Option<usize>],
    predecessors: &[Vec<usize>],
) {
    rank_nodes.sort_by(|&a, &b| {
        match (
            barycenter(&predecessors[a], prev_positions),
            barycenter(&predecessors[b], prev_positions),
        ) {
            (None, None) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((sum_a, count_a)), Some((sum_b, count_b))) => {
                // sum_a/count_a vs sum_b/count_b without floats.
                (sum_a * count_b).cmp(&(sum_b * count_a)).then_with(|| a.cmp(&b))
            }
        }
    });
}

/// Deterministic left-to-right layered layout.
///
/// - Cycles are broken by reversing DFS back edges.
/// - Ranks come from longest-path layering; unconnected nodes sit in rank 0.
/// - One barycenter sweep orders each rank; ties keep node order.
/// - Each rank is as wide as its widest node and is centered vertically.
pub fn layout_diagram(diagram: &Diagram, config: &LayoutConfig) -> DiagramLayout {
    let node_count = diagram.nodes().len();
    let index_of = diagram
        .nodes()
        .keys()
        .enumerate()
        .map(|(idx, node_id)| (node_id.as_str(), idx))
        .collect::<HashMap<_, _>>();

    // Edges with unknown endpoints and self-loops carry no ordering information.
    let edges = diagram
        .edges()
        .values()
        .filter_map(|edge| {
            let from = *index_of.get(edge.from().as_str())?;
            let to = *index_of.get(edge.to().as_str())?;
            (from != to).then_some((from, to))
        })
        .collect::<Vec<_>>();
    let edges = break_cycles(node_count, &edges);
    let ranks = assign_ranks(node_count, &edges);

    let mut predecessors = vec![Vec::new(); node_count];
    for &(from, to) in &edges {
        predecessors[to].push(from);
    }

    let rank_count = ranks.iter().copied().max().map_or(0, |max| max + 1);
    let mut rank_nodes = vec![Vec::<usize>::new(); rank_count];
    for (idx, &rank) in ranks.iter().enumerate() {
        rank_nodes[rank].push(idx);
    }
    for rank in 1..rank_count {
        let mut prev_positions = vec![None; node_count];
        for (pos, &idx) in rank_nodes[rank - 1].iter().enumerate() {
            prev_positions[idx] = Some(pos);
        }
        sort_rank_by_barycenter(&mut rank_nodes[rank], &prev_positions, &predecessors);
    }

    let sizes = diagram
        .nodes()
        .iter()
        .map(|(node_id, node)| node_size(diagram, node_id, node))
        .collect::<Vec<_>>();

    let rank_extent = |nodes: &[usize]| -> (f64, f64) {
        let width = nodes.iter().map(|&idx| sizes[idx].0).fold(0.0, f64::max);
        let height = nodes.iter().map(|&idx| sizes[idx].1).sum::<f64>()
            + config.node_sep * nodes.len().saturating_sub(1) as f64;
        (width, height)
    };
    let tallest = rank_nodes.iter().map(|nodes| rank_extent(nodes).1).fold(0.0, f64::max);

    let mut positions = vec![(0.0, 0.0); node_count];
    let mut rank_x = 0.0;
    for nodes in &rank_nodes {
        let (rank_width, rank_height) = rank_extent(nodes);
        let mut y = (tallest - rank_height) / 2.0;
        for &idx in nodes {
            let (width, height) = sizes[idx];
            positions[idx] = (rank_x + (rank_width - width) / 2.0, y);
            y += height + config.node_sep;
        }
        rank_x += rank_width + config.rank_sep;
    }

    let nodes = diagram
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, (node_id, node))| {
            let mut node_json = node_to_json(diagram, node_id, node);
            let (x, y) = positions[idx];
            node_json.position = Some(PositionJson { x, y });
            let (width, height) = sizes[idx];
            LayoutNode { node: node_json, width, height }
        })
        .collect();

    let edges = diagram
        .edges()
        .iter()
        .map(|(edge_id, edge)| LayoutEdge {
            id: edge_id.to_string(),
            source: edge.from().to_string(),
            target: edge.to().to_string(),
            edge_type: edge.kind().into(),
            descriptor: edge.descriptor().map(ToOwned::to_owned),
        })
        .collect();

    DiagramLayout { nodes, edges, ranks }
}
