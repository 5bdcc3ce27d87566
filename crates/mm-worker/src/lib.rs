pub mod client;
pub mod messages;
pub mod worker;

pub use client::ImportClient;
pub use messages::{Request, Response};
pub use worker::{
    WorkerError, decode_response, dispatch, handle_request, spawn_export, spawn_request,
};
