//! Transduction between the canonical tree, the editable map, and outline
//! text.
//!
//! Forward: depth-first tree walk producing one map node per tree node and
//! one edge per parent→child pair. Reverse: depth-first emission of heading
//! syntax for the first three depths and indented list items below, per
//! root, joined by newlines. Both directions are deterministic — node order
//! is pre-order, child order is edge insertion order.

use crate::graph::{MapEdge, MapNode, MindMap};
use crate::id::NodeId;
use crate::layout::{LayoutConfig, layout_map};
use crate::tree::{TreeNode, parse_outline};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Per-stage timing for one import, reported to callers for diagnostics
/// only — nothing downstream depends on these values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineMeta {
    pub parse_ms: f64,
    pub transduce_ms: f64,
    pub layout_ms: f64,
}

/// Full import pipeline: markdown → tree → map → positioned map.
#[must_use]
pub fn import_markdown(text: &str, config: &LayoutConfig) -> (MindMap, PipelineMeta) {
    let started = Instant::now();
    let tree = parse_outline(text);
    let parsed = Instant::now();
    let mut map = tree_to_map(&tree);
    let transduced = Instant::now();
    layout_map(&mut map, config);

    let meta = PipelineMeta {
        parse_ms: ms_between(started, parsed),
        transduce_ms: ms_between(parsed, transduced),
        layout_ms: ms_between(transduced, Instant::now()),
    };
    log::debug!(
        "imported {} nodes in {:.2}ms",
        map.nodes.len(),
        meta.parse_ms + meta.transduce_ms + meta.layout_ms
    );
    (map, meta)
}

fn ms_between(from: Instant, to: Instant) -> f64 {
    to.duration_since(from).as_secs_f64() * 1000.0
}

// ─── Forward: tree → map ────────────────────────────────────────────────

/// Convert a canonical tree into a flat mind map.
#[must_use]
pub fn tree_to_map(tree: &TreeNode) -> MindMap {
    let mut map = MindMap::default();
    visit(tree, None, &mut map);
    map
}

fn visit(node: &TreeNode, parent: Option<NodeId>, map: &mut MindMap) {
    map.nodes.push(MapNode {
        id: node.id,
        label: node.label.clone(),
        level: node.level,
        parent,
        position: None,
    });
    if let Some(parent) = parent {
        map.edges.push(MapEdge {
            id: NodeId::edge_between(parent, node.id),
            source: parent,
            target: node.id,
        });
    }
    for child in &node.children {
        visit(child, Some(node.id), map);
    }
}

// ─── Reverse: map → markdown ────────────────────────────────────────────

/// Serialize a map (or forest) back into canonical outline text.
///
/// Roots are the indegree-0 nodes; a graph with none (a caller error this
/// component tolerates) falls back to an arbitrary starting node. Emission
/// depth is the traversal depth, so the output is canonical even after
/// reparenting edits have shifted subtrees around. Nodes whose trimmed
/// label is empty produce no line, and their children emit at the depth
/// the empty node occupied.
#[must_use]
pub fn map_to_markdown(map: &MindMap) -> String {
    let mut roots = map.roots();
    if roots.is_empty() && !map.nodes.is_empty() {
        log::warn!("graph has no indegree-0 node; emitting from an arbitrary start");
        roots.push(map.nodes[0].id);
    }

    let mut visited = HashSet::new();
    let mut sections = Vec::new();
    for root in roots {
        let mut lines = Vec::new();
        emit(map, root, 0, &mut lines, &mut visited);
        if !lines.is_empty() {
            sections.push(lines.join("\n"));
        }
    }
    sections.join("\n")
}

fn emit(
    map: &MindMap,
    id: NodeId,
    depth: u32,
    lines: &mut Vec<String>,
    visited: &mut HashSet<NodeId>,
) {
    // Visited guard: the arbitrary-root fallback may walk a cyclic edge set.
    if !visited.insert(id) {
        return;
    }
    let Some(node) = map.node(id) else { return };

    let label = node.label.trim();
    let child_depth = if label.is_empty() {
        depth
    } else {
        lines.push(outline_line(depth, label));
        depth + 1
    };
    for child in map.children(id) {
        emit(map, child, child_depth, lines, visited);
    }
}

fn outline_line(depth: u32, label: &str) -> String {
    match depth {
        0 => format!("# {label}"),
        1 => format!("## {label}"),
        2 => format!("### {label}"),
        d => format!("{}- {label}", "  ".repeat((d - 3) as usize)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn forward_emits_node_per_tree_node_and_edge_per_pair() {
        let tree = parse_outline("# Doc\n## Intro\n### Point A\n");
        let map = tree_to_map(&tree);

        assert_eq!(map.nodes.len(), 3);
        assert_eq!(map.edges.len(), 2);
        assert_eq!(map.edges[0].id.as_str(), "root__0");
        assert_eq!(map.edges[1].id.as_str(), "0__0.0");
        assert!(map.is_forest());
    }

    #[test]
    fn reverse_emits_heading_ladder() {
        let tree = parse_outline("# Doc\n## Intro\n### Point A\n");
        let map = tree_to_map(&tree);
        assert_eq!(map_to_markdown(&map), "# Doc\n## Intro\n### Point A");
    }

    #[test]
    fn deep_levels_become_indented_list_items() {
        let tree = parse_outline("# D\n## L1\n### L2\n- item\n  - nested\n");
        let map = tree_to_map(&tree);
        assert_eq!(
            map_to_markdown(&map),
            "# D\n## L1\n### L2\n- item\n  - nested"
        );
    }

    #[test]
    fn empty_label_skipped_children_keep_depth() {
        let tree = parse_outline("# A\n# B\n"); // synthetic empty root
        let map = tree_to_map(&tree);
        assert_eq!(map_to_markdown(&map), "# A\n# B");
    }

    #[test]
    fn reparse_of_emission_reproduces_labels_and_levels() {
        let tree = parse_outline("# Doc\n## Intro\n### Point A\n");
        let map = tree_to_map(&tree);
        let text = map_to_markdown(&map);
        let map2 = tree_to_map(&parse_outline(&text));

        let shape: Vec<(&str, u32)> = map2.nodes.iter().map(|n| (n.label.as_str(), n.level)).collect();
        assert_eq!(shape, [("Doc", 0), ("Intro", 1), ("Point A", 2)]);
    }

    #[test]
    fn cyclic_edge_set_does_not_hang() {
        let tree = build_tree(&crate::ast::AstNode {
            content: None,
            children: vec![crate::ast::AstNode::text("solo")],
        });
        let mut map = tree_to_map(&tree);
        // Point the root's parent at its own child: no indegree-0 node left.
        let root = map.nodes[0].id;
        map.edges.push(MapEdge {
            id: NodeId::edge_between(root, root),
            source: root,
            target: root,
        });
        let out = map_to_markdown(&map);
        assert_eq!(out, "# solo");
    }

    #[test]
    fn import_pipeline_assigns_positions_and_meta() {
        let (map, meta) = import_markdown("# Doc\n## A\n## B\n", &LayoutConfig::default());
        assert!(map.nodes.iter().all(|n| n.position.is_some()));
        assert!(meta.parse_ms >= 0.0 && meta.layout_ms >= 0.0);

        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("parseMs") && json.contains("transduceMs"), "got {json}");
    }
}
