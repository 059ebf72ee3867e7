use crate::api::{Backend, WorkerStatus};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub type StatusSink = Arc<dyn Fn(Result<WorkerStatus>) + Send + Sync>;

/// Recurring worker status fetch, tied to the lifetime of whoever owns it.
///
/// Fetches once immediately on `start`, then once per interval. Stopping cancels
/// future ticks only; a fetch already sent still delivers its result.
#[derive(Default)]
pub struct StatusPoller {
    task: Option<JoinHandle<()>>,
}

impl StatusPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn start(
        &mut self,
        runtime: &Handle,
        backend: Arc<dyn Backend>,
        interval: Duration,
        on_status: StatusSink,
    ) {
        self.stop();
        info!("Polling worker status every {:?}", interval);

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let fetch = backend.worker_status();
                let on_status = on_status.clone();
                tokio::spawn(async move {
                    let result = fetch.await;
                    if let Err(e) = &result {
                        debug!("worker status unavailable: {}", e);
                    }
                    on_status(result);
                });
            }
        });
        self.task = Some(task);
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Stopped worker status polling");
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
