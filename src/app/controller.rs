use super::state::{AppEvent, AppState};
use crate::api::{Backend, ProgressSink};
use crate::search::submitted_query;
use crate::status::{StatusPoller, StatusSink};
use crate::upload::SelectedFile;
use derivative::Derivative;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Called after every event delivered from a background task (the UI uses it to repaint).
pub type Notify = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
struct EventSink {
    sender: Sender<AppEvent>,
    notify: Notify,
}

impl EventSink {
    fn send(&self, event: AppEvent) {
        if self.sender.send(event).is_ok() {
            (self.notify)();
        }
    }
}

/// Owns the client state and turns user actions into backend requests.
///
/// Requests run on the tokio runtime and report back over a channel; `pump` applies
/// whatever has arrived. Overlapping requests are not serialized, the last to resolve wins.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Controller {
    state: AppState,
    #[derivative(Debug = "ignore")]
    backend: Arc<dyn Backend>,
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    #[derivative(Debug = "ignore")]
    sink: EventSink,
    #[derivative(Debug = "ignore")]
    events: Receiver<AppEvent>,
    #[derivative(Debug = "ignore")]
    poller: StatusPoller,
    poll_interval: Duration,
}

impl Controller {
    pub fn new(
        backend: Arc<dyn Backend>,
        runtime: Handle,
        poll_interval: Duration,
        notify: Notify,
    ) -> Self {
        let (sender, events) = channel();
        Self {
            state: AppState::default(),
            backend,
            runtime,
            sink: EventSink { sender, notify },
            events,
            poller: StatusPoller::new(),
            poll_interval,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Starts the worker status poller.
    pub fn mount(&mut self) {
        if self.poller.is_running() {
            return;
        }
        let sink = self.sink.clone();
        let on_status: StatusSink =
            Arc::new(move |result| sink.send(AppEvent::StatusFetched(result)));
        self.poller.start(
            &self.runtime,
            self.backend.clone(),
            self.poll_interval,
            on_status,
        );
    }

    /// Stops future status polls. Requests already sent are left to finish.
    pub fn unmount(&mut self) {
        self.poller.stop();
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        info!("Uploading {}", file.path.display());
        self.state.begin_upload();

        let progress_sink = self.sink.clone();
        let on_progress: ProgressSink =
            Arc::new(move |event| progress_sink.send(AppEvent::UploadProgress(event)));
        let upload = self.backend.upload(file, on_progress);

        let sink = self.sink.clone();
        self.runtime.spawn(async move {
            let result = upload.await;
            match &result {
                Ok(response) => info!("Upload inserted {} rows", response.inserted_rows),
                Err(e) => warn!("Upload failed: {}", e),
            }
            sink.send(AppEvent::UploadFinished(result));
        });
    }

    /// Sends a search for the raw field contents. Returns false (and sends nothing) for blank input.
    pub fn search(&mut self, raw: &str) -> bool {
        let Some(query) = submitted_query(raw) else {
            debug!("Ignoring blank search");
            return false;
        };

        let search = self.backend.search(query.to_string());
        let sink = self.sink.clone();
        self.runtime.spawn(async move {
            let result = search.await;
            if let Ok(response) = &result {
                debug!(
                    "Search returned {} rows",
                    response.results.as_ref().map_or(0, Vec::len)
                );
            }
            sink.send(AppEvent::SearchFinished(result));
        });
        true
    }

    pub fn dismiss_alert(&mut self) {
        self.state.dismiss_alert();
    }

    /// Applies every event received since the last call. Returns whether anything changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(event);
            changed = true;
        }
        changed
    }

    #[cfg(test)]
    fn pump_until(&mut self, done: impl Fn(&AppState) -> bool) {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !done(&self.state) && std::time::Instant::now() < deadline {
            if let Ok(event) = self.events.recv_timeout(Duration::from_millis(20)) {
                self.state.apply(event);
            }
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.unmount();
    }
}
