//! Repeat-fetch task driving one page's view state
//!
//! On activation the task runs one cycle immediately, then re-arms a fixed
//! interval after each outcome is applied. Cycles are strictly serialized:
//! cycle N+1 cannot start before cycle N resolves. Stopping the handle
//! cancels the pending timer but not an in-flight cycle; a result arriving
//! after deactivation is discarded before it can touch the view state.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::sync::view_state::ViewState;

/// One fetch cycle for a page: issues all of the page's fetchers (fan-out)
/// and resolves when every one of them has (fan-in). A single failure fails
/// the whole cycle.
#[async_trait]
pub trait FetchCycle: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    async fn fetch(&self) -> Result<Self::Output, ApiError>;
}

/// View state shared between the poll task (sole writer) and the rendering
/// shell (readers)
pub type SharedViewState<T> = Arc<RwLock<ViewState<T>>>;

/// Owner of a running poll task. Not `Clone`: at most one handle per page
/// instance. Dropping it deactivates the poller.
pub struct PollHandle {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Deactivate: cancel the pending timer. An in-flight cycle keeps
    /// running; its result is discarded on arrival.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Deactivate and wait for the task to wind down
    pub async fn shutdown(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}

/// Activate a synchronizer: run one cycle immediately, then repeat at the
/// fixed interval. Returns the shared state and the handle owning the task.
pub fn spawn<C: FetchCycle>(
    name: impl Into<String>,
    interval: Duration,
    cycle: C,
) -> (SharedViewState<C::Output>, PollHandle) {
    let name = name.into();
    let state: SharedViewState<C::Output> = Arc::new(RwLock::new(ViewState::new()));
    let (stop_tx, stop_rx) = watch::channel(false);

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        run_loop(name, interval, cycle, task_state, stop_rx).await;
    });

    (
        state,
        PollHandle {
            stop_tx,
            task: Some(task),
        },
    )
}

async fn run_loop<C: FetchCycle>(
    name: String,
    interval: Duration,
    cycle: C,
    state: SharedViewState<C::Output>,
    mut stop_rx: watch::Receiver<bool>,
) {
    debug!(poller = %name, interval_secs = interval.as_secs(), "Poller activated");

    loop {
        // The stop flag is deliberately not raced against the fetch: an
        // in-flight cycle runs to completion and its result is dropped below
        // if the page deactivated meanwhile.
        let outcome = cycle.fetch().await;

        if *stop_rx.borrow() {
            debug!(poller = %name, "Discarding cycle result after deactivation");
            break;
        }

        {
            let mut view = state.write().await;
            match outcome {
                Ok(value) => view.apply_success(value),
                Err(e) => {
                    warn!(poller = %name, "Fetch cycle failed: {}", e);
                    view.apply_failure(e.to_string());
                }
            }
        }

        // Re-arm only after the outcome is applied; fixed interval, no
        // backoff, no jitter.
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    debug!(poller = %name, "Poller deactivated");
}
