//! Editing session: owns one map for its lifetime and fronts the command
//! stack.
//!
//! External collaborators that want "save this as history" callbacks get
//! them through an injected `HistorySink` handle with session-scoped
//! registration and deregistration — there is no process-wide registry.
//! The session never performs I/O itself; exported text is handed to the
//! sink or returned to the caller.

use crate::commands::{CommandStack, EditError, MapMutation};
use mm_core::graph::MindMap;
use mm_core::id::NodeId;
use mm_core::transduce::map_to_markdown;

/// Label given to freshly added nodes until the user renames them.
pub const NEW_NODE_LABEL: &str = "new node";

/// Receives exported markdown snapshots (e.g. a history list in a host
/// application).
pub type HistorySink = Box<dyn Fn(&str) + Send>;

/// External persistence collaborator. Takes finished outline text, returns
/// an opaque document identifier. Whatever I/O it does is its own business.
pub trait PersistOutline {
    fn persist(&self, markdown: &str) -> String;
}

/// One editing session over one map.
pub struct EditSession {
    map: MindMap,
    stack: CommandStack,
    history: Option<HistorySink>,
}

impl EditSession {
    /// Start a session owning `map`, with the default undo depth.
    #[must_use]
    pub fn new(map: MindMap) -> Self {
        Self::with_max_undo(map, 100)
    }

    #[must_use]
    pub fn with_max_undo(map: MindMap, max_depth: usize) -> Self {
        Self {
            map,
            stack: CommandStack::new(max_depth),
            history: None,
        }
    }

    /// Register the history callback for this session's lifetime.
    pub fn set_history_sink(&mut self, sink: HistorySink) {
        self.history = Some(sink);
    }

    /// Deregister the history callback.
    pub fn clear_history_sink(&mut self) {
        self.history = None;
    }

    /// The current map snapshot.
    #[must_use]
    pub fn map(&self) -> &MindMap {
        &self.map
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Add a placeholder-labeled child under `parent`. Returns the new
    /// node's ID.
    pub fn add_child(&mut self, parent: NodeId) -> Result<NodeId, EditError> {
        let node = NodeId::fresh();
        self.stack.execute(
            &mut self.map,
            MapMutation::AddChild {
                parent,
                node,
                label: NEW_NODE_LABEL.to_string(),
            },
            "add child",
        )?;
        Ok(node)
    }

    /// Remove `node` and its whole subtree.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<(), EditError> {
        self.stack
            .execute(&mut self.map, MapMutation::RemoveSubtree { node }, "remove subtree")
    }

    /// Replace `node`'s label.
    pub fn rename(&mut self, node: NodeId, label: &str) -> Result<(), EditError> {
        self.stack.execute(
            &mut self.map,
            MapMutation::Rename {
                node,
                label: label.to_string(),
            },
            "rename",
        )
    }

    /// Make `source` the sole parent of `target`.
    pub fn reconnect(&mut self, source: NodeId, target: NodeId) -> Result<(), EditError> {
        self.stack.execute(
            &mut self.map,
            MapMutation::Reconnect { source, target },
            "reconnect",
        )
    }

    // ─── Undo / Redo ─────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Option<String> {
        self.stack.undo(&mut self.map)
    }

    pub fn redo(&mut self) -> Option<String> {
        self.stack.redo(&mut self.map)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.stack.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.stack.can_redo()
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Serialize the current map back to outline text.
    #[must_use]
    pub fn export_markdown(&self) -> String {
        map_to_markdown(&self.map)
    }

    /// Push the current export into the registered history sink, if any.
    /// Returns whether a sink received it.
    pub fn snapshot_history(&self) -> bool {
        match &self.history {
            Some(sink) => {
                sink(&self.export_markdown());
                true
            }
            None => false,
        }
    }

    /// Hand the current export to a persistence collaborator and return
    /// the identifier it assigned.
    pub fn persist_to(&self, store: &dyn PersistOutline) -> String {
        store.persist(&self.export_markdown())
    }
}
