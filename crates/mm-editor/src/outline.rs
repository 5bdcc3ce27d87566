//! Outline-view projection: per-node expand/collapse plus search.
//!
//! Expansion is a plain set of node IDs — membership means expanded,
//! absence means collapsed (the initial state). Roots (level 0) are never
//! subject to collapse: visibility always descends through them. Search
//! only ever grows the expansion set, so a query cannot collapse what the
//! user opened by hand.

use mm_core::graph::MindMap;
use mm_core::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Expansion and search state for one document's outline view.
///
/// Serializable so it can be persisted keyed by a document identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlineState {
    expanded: HashSet<NodeId>,
    #[serde(skip)]
    matches: Vec<NodeId>,
    #[serde(skip)]
    query: String,
}

impl OutlineState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Flip one node. Returns the new state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    /// Collapse everything: only roots and their direct children stay
    /// visible.
    pub fn collapse_to_level_1(&mut self) {
        self.expanded.clear();
    }

    /// Expand every node whose tree level is at most `n - 1`, so that
    /// semantic level `n` (counted without the root's own level) becomes
    /// visible. `n = 0` expands nothing.
    pub fn expand_to_semantic_level(&mut self, map: &MindMap, n: u32) {
        self.expanded.clear();
        if n == 0 {
            return;
        }
        for node in &map.nodes {
            if node.level <= n - 1 {
                self.expanded.insert(node.id);
            }
        }
    }

    /// Expand every node reachable from the roots.
    pub fn expand_all(&mut self, map: &MindMap) {
        self.expanded.extend(map.document_order());
    }

    /// Recompute the match set for `query` (case-insensitive substring over
    /// labels) and auto-expand each match and its ancestors so every match
    /// is reachable. An empty query clears the matches but leaves the
    /// expansion set alone. Returns the number of matches.
    pub fn search(&mut self, map: &MindMap, query: &str) -> usize {
        self.query = query.to_string();
        self.matches.clear();
        if query.is_empty() {
            return 0;
        }

        let needle = query.to_lowercase();
        for id in map.document_order() {
            let hit = map
                .node(id)
                .is_some_and(|n| n.label.to_lowercase().contains(&needle));
            if hit {
                self.matches.push(id);
            }
        }
        for id in self.matches.clone() {
            self.expanded.insert(id);
            self.expanded.extend(map.ancestors(id));
        }
        self.matches.len()
    }

    /// Matches of the current query in document order.
    #[must_use]
    pub fn matches(&self) -> &[NodeId] {
        &self.matches
    }

    /// The first match in document order — the scroll-to target.
    #[must_use]
    pub fn first_match(&self) -> Option<NodeId> {
        self.matches.first().copied()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Nodes currently visible in the outline, in document order. A node's
    /// children show when it is expanded; roots always show their children
    /// (level 0 is never collapsible).
    #[must_use]
    pub fn visible_nodes(&self, map: &MindMap) -> Vec<NodeId> {
        let mut out = Vec::new();
        for root in map.roots() {
            self.collect_visible(map, root, &mut out);
        }
        out
    }

    fn collect_visible(&self, map: &MindMap, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        let always_open = map.node(id).is_some_and(|n| n.level == 0);
        if always_open || self.is_expanded(id) {
            for child in map.children(id) {
                self.collect_visible(map, child, out);
            }
        }
    }
}
