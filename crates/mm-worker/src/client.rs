//! Caller-side client for the import pipeline.
//!
//! Workers have no cancellation: a new parse request does not invalidate
//! one already in flight, so an older result can land after a newer one
//! was dispatched. The client tags every submission with a monotonically
//! increasing sequence number and discards any reply tagged lower than the
//! latest dispatch — stale results never overwrite current ones.

use crate::messages::{Request, Response};
use crate::worker::{WorkerError, decode_response, dispatch};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Funnel for import requests and their sequence-tagged replies.
pub struct ImportClient {
    latest_seq: u64,
    inbox_tx: mpsc::Sender<(u64, String)>,
    inbox_rx: mpsc::Receiver<(u64, String)>,
}

impl ImportClient {
    #[must_use]
    pub fn new() -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        Self {
            latest_seq: 0,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Dispatch a parse request on a fresh worker. Returns the sequence
    /// number assigned to it.
    pub fn submit(&mut self, markdown: &str) -> Result<u64, WorkerError> {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let wire = serde_json::to_string(&Request::ParseMarkdown {
            markdown: markdown.to_string(),
        })?;
        let tx = self.inbox_tx.clone();
        thread::Builder::new()
            .name(format!("mm-import-{seq}"))
            .spawn(move || {
                let _ = tx.send((seq, dispatch(&wire)));
            })?;
        Ok(seq)
    }

    /// Non-blocking poll: drain the inbox and return the reply to the
    /// latest dispatch if it has arrived. Everything older is discarded.
    pub fn try_latest(&mut self) -> Option<Response> {
        let mut newest: Option<(u64, String)> = None;
        while let Ok(tagged) = self.inbox_rx.try_recv() {
            if newest.as_ref().is_none_or(|(seq, _)| tagged.0 > *seq) {
                newest = Some(tagged);
            }
        }
        match newest {
            Some((seq, wire)) if seq == self.latest_seq => Some(decode_response(&wire)),
            Some((seq, _)) => {
                log::debug!("discarding stale import reply #{seq} (latest is #{})", self.latest_seq);
                None
            }
            None => None,
        }
    }

    /// Block until the latest dispatch replies or `timeout` passes. The
    /// worker itself never times out — this is the caller-side policy.
    pub fn wait_latest(&mut self, timeout: Duration) -> Option<Response> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.inbox_rx.recv_timeout(remaining) {
                Ok((seq, wire)) if seq == self.latest_seq => {
                    return Some(decode_response(&wire));
                }
                Ok((seq, _)) => {
                    log::debug!(
                        "discarding stale import reply #{seq} (latest is #{})",
                        self.latest_seq
                    );
                }
                Err(_) => return None,
            }
        }
    }
}

impl Default for ImportClient {
    fn default() -> Self {
        Self::new()
    }
}
