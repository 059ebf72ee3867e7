use crate::api::{
    ProgressEvent, ResultRow, SearchResponse, UploadOutcome, UploadResponse, WorkerStatus,
};
use crate::error::Result;
use crate::status::StatusView;
use std::collections::VecDeque;

/// Messages delivered to the UI thread by background requests.
#[derive(Debug)]
pub enum AppEvent {
    UploadProgress(ProgressEvent),
    UploadFinished(Result<UploadResponse>),
    SearchFinished(Result<SearchResponse>),
    StatusFetched(Result<WorkerStatus>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    percent: u8,
    reported: bool,
}

impl UploadProgress {
    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }

    /// False until the transport reports a known total; the UI shows an indeterminate state until then.
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    fn record(&mut self, event: &ProgressEvent) {
        if let Some(percent) = event.percent() {
            self.percent = percent.min(100);
            self.reported = true;
        }
    }
}

/// Everything the window shows. Views get `&AppState`; only the transitions below mutate it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    results: Vec<ResultRow>,
    uploading: bool,
    progress: UploadProgress,
    outcome: Option<UploadOutcome>,
    alerts: VecDeque<String>,
    worker: StatusView,
}

impl AppState {
    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn progress(&self) -> UploadProgress {
        self.progress
    }

    pub fn outcome(&self) -> Option<&UploadOutcome> {
        self.outcome.as_ref()
    }

    /// The alert currently blocking the window, if any.
    pub fn alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn worker(&self) -> &StatusView {
        &self.worker
    }

    pub fn begin_upload(&mut self) {
        self.uploading = true;
        self.progress = UploadProgress::default();
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::UploadProgress(progress) => {
                if self.uploading {
                    self.progress.record(&progress);
                }
            }
            AppEvent::UploadFinished(result) => {
                match result {
                    Ok(response) => {
                        self.outcome = Some(response.outcome());
                        self.results = response.details.unwrap_or_default();
                    }
                    Err(e) => self.alerts.push_back(format!("Upload failed: {}", e.user_message())),
                }
                self.uploading = false;
                self.progress = UploadProgress::default();
            }
            AppEvent::SearchFinished(result) => match result {
                Ok(response) => self.results = response.results.unwrap_or_default(),
                Err(e) => self.alerts.push_back(format!("Search failed: {}", e.user_message())),
            },
            AppEvent::StatusFetched(result) => self.worker = StatusView::from_fetch(result),
        }
    }
}
