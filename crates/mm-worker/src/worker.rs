//! Worker execution: one short-lived thread per logical unit of work.
//!
//! There is no pool and no cancellation — a worker runs exactly one
//! request, posts exactly one reply through its channel, and exits. The
//! interactive thread never blocks; it submits and later drains the reply
//! channel. A worker that panics still replies, as an `error` envelope.

use crate::messages::{Request, Response};
use mm_core::graph::MindMap;
use mm_core::layout::LayoutConfig;
use mm_core::transduce::{import_markdown, map_to_markdown};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

/// Failures on the caller side of the boundary. Failures *inside* a worker
/// never surface here — they come back as `Response::Error`.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Run one request synchronously. This is the body every worker executes.
#[must_use]
pub fn handle_request(request: Request) -> Response {
    match request {
        Request::ParseMarkdown { markdown } => {
            let (map, meta) = import_markdown(&markdown, &LayoutConfig::default());
            Response::Graph {
                nodes: map.nodes,
                edges: map.edges,
                meta,
            }
        }
        Request::GraphToMarkdown { nodes, edges } => {
            let map = MindMap::new(nodes, edges);
            Response::Markdown {
                markdown: map_to_markdown(&map),
            }
        }
    }
}

/// Wire entry point: JSON request in, JSON response out.
///
/// A malformed envelope or a panic inside the pipeline both come back as
/// `error` envelopes — the boundary itself never throws.
#[must_use]
pub fn dispatch(wire: &str) -> String {
    let response = match serde_json::from_str::<Request>(wire) {
        Ok(request) => {
            match catch_unwind(AssertUnwindSafe(|| handle_request(request))) {
                Ok(response) => response,
                Err(_) => {
                    log::warn!("worker panicked while handling a request");
                    Response::Error {
                        message: "worker panicked while handling the request".to_string(),
                    }
                }
            }
        }
        Err(err) => Response::Error {
            message: format!("malformed request envelope: {err}"),
        },
    };
    serde_json::to_string(&response).unwrap_or_else(|_| {
        r#"{"type":"error","payload":{"message":"response encoding failed"}}"#.to_string()
    })
}

/// Decode a wire response. A payload the caller cannot read becomes an
/// `Error` response rather than a decode failure.
#[must_use]
pub fn decode_response(wire: &str) -> Response {
    serde_json::from_str(wire).unwrap_or_else(|err| Response::Error {
        message: format!("malformed response envelope: {err}"),
    })
}

/// Spawn a fresh worker for `request`. The returned channel yields the
/// single wire-format reply; the thread tears itself down afterwards.
pub fn spawn_request(request: &Request) -> Result<mpsc::Receiver<String>, WorkerError> {
    let wire = serde_json::to_string(request)?;
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("mm-worker".to_string())
        .spawn(move || {
            // The receiver may already be gone on component teardown.
            let _ = tx.send(dispatch(&wire));
        })?;
    Ok(rx)
}

/// Spawn an independent export worker for one outbound request.
pub fn spawn_export(map: &MindMap) -> Result<mpsc::Receiver<String>, WorkerError> {
    spawn_request(&Request::GraphToMarkdown {
        nodes: map.nodes.clone(),
        edges: map.edges.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::transduce::tree_to_map;
    use mm_core::tree::parse_outline;
    use std::time::Duration;

    #[test]
    fn parse_request_yields_positioned_graph() {
        let response = handle_request(Request::ParseMarkdown {
            markdown: "# Doc\n## A\n".into(),
        });
        match response {
            Response::Graph { nodes, edges, meta } => {
                assert_eq!(nodes.len(), 2);
                assert_eq!(edges.len(), 1);
                assert!(nodes.iter().all(|n| n.position.is_some()));
                assert!(meta.parse_ms >= 0.0);
            }
            other => panic!("expected graph response, got {other:?}"),
        }
    }

    #[test]
    fn export_request_yields_markdown() {
        let map = tree_to_map(&parse_outline("# Doc\n## A\n"));
        let response = handle_request(Request::GraphToMarkdown {
            nodes: map.nodes,
            edges: map.edges,
        });
        match response {
            Response::Markdown { markdown } => assert_eq!(markdown, "# Doc\n## A"),
            other => panic!("expected markdown response, got {other:?}"),
        }
    }

    #[test]
    fn malformed_envelope_becomes_error_response() {
        let reply = dispatch("{\"type\":\"unknown\"}");
        match decode_response(&reply) {
            Response::Error { message } => assert!(message.contains("malformed")),
            other => panic!("expected error response, got {other:?}"),
        }
    }

    #[test]
    fn spawned_worker_replies_once_and_exits() {
        let rx = spawn_request(&Request::ParseMarkdown {
            markdown: "# Doc\n".into(),
        })
        .unwrap();
        let wire = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(decode_response(&wire), Response::Graph { .. }));
        // Exactly one reply: the channel is now closed.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
