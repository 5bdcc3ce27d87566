//! Undo/Redo command stack over map mutations.
//!
//! Every mutation is wrapped in a reversible `Command` holding its forward
//! and inverse mutation. Undo pops the undo stack, applies the inverse, and
//! moves the command to the redo stack; redo re-applies the *retained*
//! command's forward mutation — never an inverse derived from the inverse.
//! Applying a mutation produces a fresh `MindMap` snapshot, so a consumer
//! holding the previous value never observes a half-mutated graph.

use mm_core::graph::{MapEdge, MapNode, MindMap};
use mm_core::id::NodeId;
use std::collections::HashSet;
use thiserror::Error;

/// Failure modes for map mutations. All leave the graph untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("reconnecting {target} under {source} would create a cycle")]
    WouldCycle { source: NodeId, target: NodeId },
    #[error("nothing to restore")]
    EmptyRestore,
}

/// A single reversible change to the map.
///
/// `Detach` and `Restore` only ever appear as computed inverses; the
/// editing surface issues the first four.
#[derive(Debug, Clone)]
pub enum MapMutation {
    /// Insert `node` as a new child of `parent`.
    AddChild {
        parent: NodeId,
        node: NodeId,
        label: String,
    },
    /// Remove `node` and its full descendant closure.
    RemoveSubtree { node: NodeId },
    /// Replace a node's label in place.
    Rename { node: NodeId, label: String },
    /// Make `source` the (sole) parent of `target`.
    Reconnect { source: NodeId, target: NodeId },
    /// Drop `target`'s incoming edge, making it a root.
    Detach { target: NodeId },
    /// Re-insert a previously captured subtree. The first node is the
    /// subtree root.
    Restore {
        nodes: Vec<MapNode>,
        edges: Vec<MapEdge>,
    },
}

/// A command that captures a forward mutation and its inverse.
#[derive(Debug, Clone)]
pub struct Command {
    forward: MapMutation,
    inverse: MapMutation,
    description: String,
}

impl Command {
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Manages undo/redo stacks. Single-threaded by contract — one logical
/// edit source at a time.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth; the oldest entry is trimmed beyond it.
    max_depth: usize,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Validate and apply a mutation, pushing its command on the undo
    /// stack. Any new mutation clears the redo stack. On error nothing
    /// changes.
    pub fn execute(
        &mut self,
        map: &mut MindMap,
        mutation: MapMutation,
        description: &str,
    ) -> Result<(), EditError> {
        let inverse = compute_inverse(map, &mutation)?;
        *map = apply_mutation(map, &mutation)?;

        self.undo_stack.push(Command {
            forward: mutation,
            inverse,
            description: description.to_string(),
        });
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the last command. Returns its description.
    pub fn undo(&mut self, map: &mut MindMap) -> Option<String> {
        let cmd = self.undo_stack.pop()?;
        match apply_mutation(map, &cmd.inverse) {
            Ok(next) => {
                *map = next;
                let desc = cmd.description.clone();
                self.redo_stack.push(cmd);
                Some(desc)
            }
            Err(err) => {
                log::warn!("undo of '{}' failed: {err}", cmd.description);
                self.undo_stack.push(cmd);
                None
            }
        }
    }

    /// Redo the last undone command by re-applying its forward mutation.
    pub fn redo(&mut self, map: &mut MindMap) -> Option<String> {
        let cmd = self.redo_stack.pop()?;
        match apply_mutation(map, &cmd.forward) {
            Ok(next) => {
                *map = next;
                let desc = cmd.description.clone();
                self.undo_stack.push(cmd);
                Some(desc)
            }
            Err(err) => {
                log::warn!("redo of '{}' failed: {err}", cmd.description);
                self.redo_stack.push(cmd);
                None
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

/// Apply `mutation` to `map`, returning a new snapshot.
pub fn apply_mutation(map: &MindMap, mutation: &MapMutation) -> Result<MindMap, EditError> {
    match mutation {
        MapMutation::AddChild {
            parent,
            node,
            label,
        } => {
            let level = map
                .node(*parent)
                .ok_or(EditError::UnknownNode(*parent))?
                .level
                + 1;
            let mut next = map.clone();
            next.nodes.push(MapNode {
                id: *node,
                label: label.clone(),
                level,
                parent: Some(*parent),
                position: None,
            });
            next.edges.push(MapEdge {
                id: NodeId::edge_between(*parent, *node),
                source: *parent,
                target: *node,
            });
            Ok(next)
        }

        MapMutation::RemoveSubtree { node } => {
            if !map.contains(*node) {
                return Err(EditError::UnknownNode(*node));
            }
            let closure: HashSet<NodeId> = map.subtree(*node).into_iter().collect();
            let mut next = map.clone();
            next.nodes.retain(|n| !closure.contains(&n.id));
            next.edges
                .retain(|e| !closure.contains(&e.source) && !closure.contains(&e.target));
            Ok(next)
        }

        MapMutation::Rename { node, label } => {
            let mut next = map.clone();
            let target = next
                .node_mut(*node)
                .ok_or(EditError::UnknownNode(*node))?;
            target.label = label.clone();
            Ok(next)
        }

        MapMutation::Reconnect { source, target } => {
            if !map.contains(*source) {
                return Err(EditError::UnknownNode(*source));
            }
            if !map.contains(*target) {
                return Err(EditError::UnknownNode(*target));
            }
            // Hooking a node under its own subtree would break the forest.
            if map.subtree(*target).contains(source) {
                return Err(EditError::WouldCycle {
                    source: *source,
                    target: *target,
                });
            }

            let mut next = map.clone();
            // At most one parent: the old incoming edge goes away in the
            // same step the new one lands.
            next.edges.retain(|e| e.target != *target);
            next.edges.push(MapEdge {
                id: NodeId::edge_between(*source, *target),
                source: *source,
                target: *target,
            });

            let new_level = next
                .node(*source)
                .map(|n| n.level + 1)
                .unwrap_or(0) as i64;
            let old_level = next.node(*target).map(|n| n.level).unwrap_or(0) as i64;
            shift_subtree(&mut next, *target, Some(*source), new_level - old_level);
            Ok(next)
        }

        MapMutation::Detach { target } => {
            if !map.contains(*target) {
                return Err(EditError::UnknownNode(*target));
            }
            let mut next = map.clone();
            next.edges.retain(|e| e.target != *target);
            let old_level = next.node(*target).map(|n| n.level).unwrap_or(0) as i64;
            shift_subtree(&mut next, *target, None, -old_level);
            Ok(next)
        }

        MapMutation::Restore { nodes, edges } => {
            if nodes.is_empty() {
                return Err(EditError::EmptyRestore);
            }
            let mut next = map.clone();
            next.nodes.extend(nodes.iter().cloned());
            next.edges.extend(edges.iter().copied());
            Ok(next)
        }
    }
}

/// Re-point `root`'s parent field and shift the levels of its whole
/// subtree by `delta`.
fn shift_subtree(map: &mut MindMap, root: NodeId, new_parent: Option<NodeId>, delta: i64) {
    let ids = map.subtree(root);
    for id in ids {
        if let Some(node) = map.node_mut(id) {
            node.level = (node.level as i64 + delta).max(0) as u32;
        }
    }
    if let Some(node) = map.node_mut(root) {
        node.parent = new_parent;
    }
}

/// Compute the inverse mutation needed to undo `mutation`, capturing the
/// pre-mutation state it restores.
pub fn compute_inverse(map: &MindMap, mutation: &MapMutation) -> Result<MapMutation, EditError> {
    match mutation {
        MapMutation::AddChild { node, parent, .. } => {
            if !map.contains(*parent) {
                return Err(EditError::UnknownNode(*parent));
            }
            Ok(MapMutation::RemoveSubtree { node: *node })
        }

        MapMutation::RemoveSubtree { node } => {
            if !map.contains(*node) {
                return Err(EditError::UnknownNode(*node));
            }
            let closure: HashSet<NodeId> = map.subtree(*node).into_iter().collect();
            // Capture in map order so the subtree root stays first.
            let mut nodes: Vec<MapNode> = map
                .nodes
                .iter()
                .filter(|n| closure.contains(&n.id))
                .cloned()
                .collect();
            if let Some(pos) = nodes.iter().position(|n| n.id == *node)
                && pos != 0
            {
                let root = nodes.remove(pos);
                nodes.insert(0, root);
            }
            let edges: Vec<MapEdge> = map
                .edges
                .iter()
                .filter(|e| closure.contains(&e.source) || closure.contains(&e.target))
                .copied()
                .collect();
            Ok(MapMutation::Restore { nodes, edges })
        }

        MapMutation::Rename { node, .. } => {
            let previous = map.node(*node).ok_or(EditError::UnknownNode(*node))?;
            Ok(MapMutation::Rename {
                node: *node,
                label: previous.label.clone(),
            })
        }

        MapMutation::Reconnect { target, .. } => match map.parent_of(*target) {
            Some(previous) => Ok(MapMutation::Reconnect {
                source: previous,
                target: *target,
            }),
            None => Ok(MapMutation::Detach { target: *target }),
        },

        MapMutation::Detach { target } => match map.parent_of(*target) {
            Some(previous) => Ok(MapMutation::Reconnect {
                source: previous,
                target: *target,
            }),
            None => Ok(MapMutation::Detach { target: *target }),
        },

        MapMutation::Restore { nodes, .. } => {
            let root = nodes.first().ok_or(EditError::EmptyRestore)?;
            Ok(MapMutation::RemoveSubtree { node: root.id })
        }
    }
}
