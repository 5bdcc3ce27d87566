pub mod ast;
pub mod graph;
pub mod id;
pub mod layout;
pub mod markdown;
pub mod sanitize;
pub mod transduce;
pub mod tree;

pub use graph::{MapEdge, MapNode, MindMap, Point};
pub use id::NodeId;
pub use layout::{LayoutConfig, layout_map};
pub use sanitize::sanitize_label;
pub use transduce::{PipelineMeta, import_markdown, map_to_markdown, tree_to_map};
pub use tree::{TreeNode, build_tree, parse_outline};
