//! Canonical outline tree, built from the parser AST.
//!
//! The tree is rebuilt wholesale on every parse and never mutated — edits
//! happen on the derived map (see `transduce`). IDs are path-derived and
//! therefore stable: reparsing textually identical input reproduces every
//! ID, and a structural change only disturbs IDs downstream of it.

use crate::ast::AstNode;
use crate::id::NodeId;
use crate::markdown;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Label of the fallback tree substituted on parse failure.
pub const PARSE_FAILED_LABEL: &str = "parse failed";

/// One node of the canonical outline tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Path-derived ID: `root` for the root, else dot-joined child indices
    /// (`0`, `0.1`, …).
    pub id: NodeId,
    /// Sanitized display label.
    pub label: String,
    /// Depth from the root (root = 0).
    pub level: u32,
    /// Children in document order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Count of nodes in this subtree, including itself.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Parse markdown into a canonical tree.
///
/// Never fails: input from which no outline can be recovered produces the
/// single-node fallback tree instead of an error.
#[must_use]
pub fn parse_outline(text: &str) -> TreeNode {
    let ast = markdown::to_ast(text);
    if ast.children.is_empty() {
        log::warn!("no outline recovered from {} bytes of input", text.len());
        return fallback_tree();
    }
    build_tree(&ast)
}

/// Build a canonical tree from a parser AST root.
///
/// A single top-level node becomes the tree root itself (the common
/// one-`#`-heading document); otherwise a label-less root is synthesized
/// above the top-level siblings. Empty-labeled leaf subtrees are pruned
/// after building.
#[must_use]
pub fn build_tree(ast_root: &AstNode) -> TreeNode {
    let mut root = if ast_root.children.len() == 1 {
        build_node(&ast_root.children[0], NodeId::root(), &SmallVec::new(), 0)
    } else {
        build_node(ast_root, NodeId::root(), &SmallVec::new(), 0)
    };
    prune_empty(&mut root);
    root
}

/// The single-node tree substituted when parsing fails.
#[must_use]
pub fn fallback_tree() -> TreeNode {
    TreeNode {
        id: NodeId::root(),
        label: PARSE_FAILED_LABEL.to_string(),
        level: 0,
        children: Vec::new(),
    }
}

/// Depth-first construction: `path` is the ancestor child-index trail.
fn build_node(ast: &AstNode, id: NodeId, path: &SmallVec<[usize; 8]>, level: u32) -> TreeNode {
    let children = ast
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let mut child_path = path.clone();
            child_path.push(index);
            build_node(child, path_id(&child_path), &child_path, level + 1)
        })
        .collect();

    TreeNode {
        id,
        label: ast.label(),
        level,
        children,
    }
}

/// Join a child-index trail into a path ID (`[0, 1]` → `0.1`).
fn path_id(path: &[usize]) -> NodeId {
    let joined = path
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(".");
    NodeId::intern(&joined)
}

/// Drop children whose trimmed label is empty and which, after their own
/// pruning, have no children left. The root itself is never dropped.
fn prune_empty(node: &mut TreeNode) {
    for child in &mut node.children {
        prune_empty(child);
    }
    node.children
        .retain(|c| !c.label.trim().is_empty() || !c.children.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(node: &TreeNode) -> Vec<&str> {
        let mut out = vec![node.id.as_str()];
        for child in &node.children {
            out.extend(ids(child));
        }
        out
    }

    #[test]
    fn single_heading_becomes_root() {
        let tree = parse_outline("# Doc\n## Intro\n### Point A\n");
        assert_eq!(tree.id, NodeId::root());
        assert_eq!(tree.label, "Doc");
        assert_eq!(tree.level, 0);
        assert_eq!(tree.children[0].label, "Intro");
        assert_eq!(tree.children[0].level, 1);
        assert_eq!(tree.children[0].children[0].label, "Point A");
        assert_eq!(tree.children[0].children[0].level, 2);
    }

    #[test]
    fn path_ids_are_stable_across_reparses() {
        let text = "# Doc\n## A\n## B\n- item\n";
        let first = parse_outline(text);
        let second = parse_outline(text);
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), ["root", "0", "1", "1.0"]);
    }

    #[test]
    fn sibling_insert_only_disturbs_downstream_ids() {
        let before = parse_outline("# Doc\n## A\n## C\n");
        let after = parse_outline("# Doc\n## A\n## B\n## C\n");
        // Upstream sibling keeps its ID; the shifted sibling gets a new one.
        assert_eq!(before.children[0].id, after.children[0].id);
        assert_eq!(after.children[2].id.as_str(), "2");
    }

    #[test]
    fn multiple_top_headings_get_synthetic_root() {
        let tree = parse_outline("# A\n# B\n");
        assert_eq!(tree.id, NodeId::root());
        assert_eq!(tree.label, "");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].label, "A");
        assert_eq!(tree.children[0].level, 1);
    }

    #[test]
    fn prunes_whitespace_only_leaves() {
        use crate::ast::AstNode;
        let mut doc = AstNode::text("Doc");
        let mut section = AstNode::text("  ");
        section.children.push(AstNode::text("   "));
        doc.children.push(section);
        doc.children.push(AstNode::text("Kept"));
        let root = AstNode {
            content: None,
            children: vec![doc],
        };

        let tree = build_tree(&root);
        // The empty section lost its empty leaf, then got pruned itself.
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].label, "Kept");
    }

    #[test]
    fn empty_branch_with_real_descendant_survives() {
        use crate::ast::AstNode;
        let mut doc = AstNode::text("Doc");
        let mut section = AstNode::text("");
        section.children.push(AstNode::text("deep"));
        doc.children.push(section);
        let root = AstNode {
            content: None,
            children: vec![doc],
        };

        let tree = build_tree(&root);
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].children[0].label, "deep");
    }

    #[test]
    fn unparseable_input_yields_fallback() {
        let tree = parse_outline("");
        assert_eq!(tree.label, PARSE_FAILED_LABEL);
        assert_eq!(tree.level, 0);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn tree_size_counts_all_nodes() {
        let tree = parse_outline("# Doc\n## A\n## B\n");
        assert_eq!(tree.size(), 3);
    }
}
