use super::models::{HealthStatus, SearchResponse, UploadResponse, WorkerStatus};
use crate::error::Result;
use crate::upload::SelectedFile;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Bytes handed to the transport so far for one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl ProgressEvent {
    /// Rounded percent, or `None` when the total size is unknown.
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(total) if total > 0 => {
                let ratio = self.loaded.min(total) as f64 / total as f64;
                Some((ratio * 100.0).round() as u8)
            }
            _ => None,
        }
    }
}

pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// The requests the client makes against the leak backend.
///
/// Futures are `'static` so they can be spawned onto the runtime directly.
pub trait Backend: Send + Sync {
    fn upload(
        &self,
        file: SelectedFile,
        on_progress: ProgressSink,
    ) -> BoxFuture<'static, Result<UploadResponse>>;

    fn search(&self, query: String) -> BoxFuture<'static, Result<SearchResponse>>;

    fn worker_status(&self) -> BoxFuture<'static, Result<WorkerStatus>>;

    fn health(&self) -> BoxFuture<'static, Result<HealthStatus>>;
}
