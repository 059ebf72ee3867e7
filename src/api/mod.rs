mod backend;
mod client;
#[cfg(test)]
pub mod fake;
mod models;

pub use backend::{Backend, ProgressEvent, ProgressSink};
pub use client::{resolve_link, HttpBackend};
pub use models::{ResultRow, SearchResponse, UploadOutcome, UploadResponse, WorkerStatus};
