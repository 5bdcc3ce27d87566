//! Editable mind-map graph derived from the canonical tree.
//!
//! Unlike the tree, the map is flat — parallel `nodes`/`edges` vectors that
//! serialize directly onto the worker wire format. The edge set must stay a
//! forest (every node has at most one incoming edge); the command engine
//! preserves that by construction, this module only provides the queries.
//! Child order is edge insertion order, which makes reverse transduction
//! deterministic.

use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A 2D position assigned by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One node of the mind map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: NodeId,
    pub label: String,
    /// Depth from the nearest root (kept in sync by the command engine).
    pub level: u32,
    /// Parent node, mirrored from the edge set for O(1) lookup.
    #[serde(rename = "parentId")]
    pub parent: Option<NodeId>,
    /// Unset until the layout engine runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

/// A parent→child connection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapEdge {
    pub id: NodeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// The complete mind map: flat node/edge lists plus forest queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub nodes: Vec<MapNode>,
    pub edges: Vec<MapEdge>,
}

impl MindMap {
    #[must_use]
    pub fn new(nodes: Vec<MapNode>, edges: Vec<MapEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Look up a node by ID.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&MapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node mutably by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MapNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Children of `id` in edge insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.target)
            .collect()
    }

    /// The parent of `id`, if it has an incoming edge.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.edges.iter().find(|e| e.target == id).map(|e| e.source)
    }

    /// Nodes with no incoming edge, in node order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let targets: HashSet<NodeId> = self.edges.iter().map(|e| e.target).collect();
        self.nodes
            .iter()
            .filter(|n| !targets.contains(&n.id))
            .map(|n| n.id)
            .collect()
    }

    /// The subtree rooted at `id` (including `id` itself), via edge
    /// traversal in depth-first document order.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children = self.children(current);
            for child in children.into_iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// All nodes in depth-first document order, starting from the roots.
    #[must_use]
    pub fn document_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for root in self.roots() {
            out.extend(self.subtree(root));
        }
        out
    }

    /// Ancestor chain of `id`, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            // Guard against a corrupted (cyclic) edge set.
            if out.contains(&parent) || parent == id {
                log::warn!("ancestor cycle detected at {parent}");
                break;
            }
            out.push(parent);
            current = parent;
        }
        out
    }

    /// Number of incoming edges for `id`.
    #[must_use]
    pub fn indegree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.target == id).count()
    }

    /// True when every node has at most one incoming edge.
    #[must_use]
    pub fn is_forest(&self) -> bool {
        self.nodes.iter().all(|n| self.indegree(n.id) <= 1)
    }

    /// Compare node/edge *sets* (order-insensitive) — the equality that
    /// matters for undo/redo identity, where re-inserted elements may land
    /// at different vector positions.
    #[must_use]
    pub fn same_contents(&self, other: &MindMap) -> bool {
        if self.nodes.len() != other.nodes.len() || self.edges.len() != other.edges.len() {
            return false;
        }
        self.nodes.iter().all(|n| {
            other
                .node(n.id)
                .is_some_and(|o| o.label == n.label && o.level == n.level && o.parent == n.parent)
        }) && self.edges.iter().all(|e| other.edges.contains(e))
    }
}
