//! Layered left-to-right layout for the mind map.
//!
//! Ranks are longest path from the roots, computed in topological order
//! over a petgraph `DiGraph` built from the edge set. Within a rank, rows
//! are assigned in document (node) order. Positions come out of a fixed
//! per-node footprint plus spacing constants, so identical node/edge order
//! always produces identical, non-overlapping positions. The layout holds
//! no state between calls.

use crate::graph::{MindMap, Point};
use crate::id::NodeId;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, VecDeque};

/// Node footprint and spacing constants.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Fixed width reserved per node.
    pub node_width: f32,
    /// Fixed height reserved per node.
    pub node_height: f32,
    /// Horizontal gap between ranks.
    pub rank_gap: f32,
    /// Vertical gap between nodes within a rank.
    pub node_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 172.0,
            node_height: 36.0,
            rank_gap: 64.0,
            node_gap: 12.0,
        }
    }
}

/// Assign a position to every node of the map.
pub fn layout_map(map: &mut MindMap, config: &LayoutConfig) {
    if map.nodes.is_empty() {
        return;
    }

    let mut digraph: DiGraph<NodeId, ()> = DiGraph::new();
    let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
    for node in &map.nodes {
        index.insert(node.id, digraph.add_node(node.id));
    }
    for edge in &map.edges {
        if let (Some(&s), Some(&t)) = (index.get(&edge.source), index.get(&edge.target)) {
            digraph.add_edge(s, t, ());
        }
    }

    let ranks = match toposort(&digraph, None) {
        Ok(order) => longest_path_ranks(&digraph, &order),
        Err(_) => {
            // A broken (cyclic) edge set still gets positions.
            log::warn!("cycle in edge set; falling back to BFS depth ranks");
            bfs_ranks(map)
        }
    };

    let mut next_row: HashMap<u32, u32> = HashMap::new();
    for node in &mut map.nodes {
        let rank = ranks.get(&node.id).copied().unwrap_or(0);
        let row = next_row.entry(rank).or_insert(0);
        node.position = Some(Point {
            x: rank as f32 * (config.node_width + config.rank_gap),
            y: *row as f32 * (config.node_height + config.node_gap),
        });
        *row += 1;
    }
    log::debug!(
        "layout: {} nodes over {} ranks",
        map.nodes.len(),
        next_row.len()
    );
}

/// rank(n) = max over incoming (rank(parent) + 1), 0 at the roots.
/// Processing in topological order makes every parent rank final before
/// its children read it.
fn longest_path_ranks(
    digraph: &DiGraph<NodeId, ()>,
    order: &[NodeIndex],
) -> HashMap<NodeId, u32> {
    let mut by_index: HashMap<NodeIndex, u32> = HashMap::new();
    for &idx in order {
        let rank = digraph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|p| by_index.get(&p).copied().unwrap_or(0) + 1)
            .max()
            .unwrap_or(0);
        by_index.insert(idx, rank);
    }
    by_index
        .into_iter()
        .map(|(idx, rank)| (digraph[idx], rank))
        .collect()
}

fn bfs_ranks(map: &MindMap) -> HashMap<NodeId, u32> {
    let mut ranks: HashMap<NodeId, u32> = HashMap::new();
    let mut queue: VecDeque<(NodeId, u32)> =
        map.roots().into_iter().map(|r| (r, 0)).collect();
    if queue.is_empty() && !map.nodes.is_empty() {
        queue.push_back((map.nodes[0].id, 0));
    }
    while let Some((id, rank)) = queue.pop_front() {
        if ranks.contains_key(&id) {
            continue;
        }
        ranks.insert(id, rank);
        for child in map.children(id) {
            queue.push_back((child, rank + 1));
        }
    }
    ranks
}
