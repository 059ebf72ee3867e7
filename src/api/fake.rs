//! Scripted backend used by the controller and poller tests.

use super::backend::{Backend, ProgressEvent, ProgressSink};
use super::models::{HealthStatus, SearchResponse, UploadResponse, WorkerStatus};
use crate::error::{ClientError, Result};
use crate::upload::SelectedFile;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeBackend {
    pub upload_replies: Mutex<VecDeque<Result<UploadResponse>>>,
    pub upload_progress: Vec<ProgressEvent>,
    pub search_replies: Mutex<VecDeque<Result<SearchResponse>>>,
    pub searched: Mutex<Vec<String>>,
    pub status_calls: AtomicUsize,
    pub status_down: AtomicBool,
}

impl FakeBackend {
    pub fn network_error() -> ClientError {
        ClientError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

impl Backend for FakeBackend {
    fn upload(
        &self,
        _file: SelectedFile,
        on_progress: ProgressSink,
    ) -> BoxFuture<'static, Result<UploadResponse>> {
        for event in &self.upload_progress {
            on_progress(*event);
        }
        let reply = self
            .upload_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::network_error()));
        async move { reply }.boxed()
    }

    fn search(&self, query: String) -> BoxFuture<'static, Result<SearchResponse>> {
        self.searched.lock().unwrap().push(query);
        let reply = self
            .search_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::network_error()));
        async move { reply }.boxed()
    }

    fn worker_status(&self) -> BoxFuture<'static, Result<WorkerStatus>> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst) as u64;
        let reply = if self.status_down.load(Ordering::SeqCst) {
            Err(Self::network_error())
        } else {
            Ok(WorkerStatus {
                running: true,
                inserted_leaks: call,
                ..WorkerStatus::default()
            })
        };
        async move { reply }.boxed()
    }

    fn health(&self) -> BoxFuture<'static, Result<HealthStatus>> {
        async {
            Ok(HealthStatus {
                status: "ok".to_string(),
                detail: None,
            })
        }
        .boxed()
    }
}
