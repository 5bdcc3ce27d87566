//! Wire envelopes for the worker boundary.
//!
//! Everything crossing the boundary is a JSON `{type, payload}` envelope —
//! the sole wire format. Requests and responses are adjacently tagged
//! enums so the JSON shape falls out of the type definitions.

use mm_core::graph::{MapEdge, MapNode};
use mm_core::transduce::PipelineMeta;
use serde::{Deserialize, Serialize};

/// A request posted to a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Request {
    /// Run the import pipeline: markdown → tree → map → positioned map.
    ParseMarkdown { markdown: String },
    /// Run the export pipeline: map → canonical outline text.
    GraphToMarkdown {
        nodes: Vec<MapNode>,
        edges: Vec<MapEdge>,
    },
}

/// The single reply a worker emits for a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Response {
    /// Import result: positioned nodes/edges plus stage timings.
    Graph {
        nodes: Vec<MapNode>,
        edges: Vec<MapEdge>,
        meta: PipelineMeta,
    },
    /// Export result.
    Markdown { markdown: String },
    /// Any failure inside the worker, as a human-readable message.
    Error { message: String },
}
