pub mod commands;
pub mod outline;
pub mod session;

pub use commands::{Command, CommandStack, EditError, MapMutation, apply_mutation, compute_inverse};
pub use outline::OutlineState;
pub use session::{EditSession, HistorySink, NEW_NODE_LABEL, PersistOutline};
