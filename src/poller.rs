// Periodic poller: drives a SnapshotSource and holds the latest view.
// The loop awaits each attempt before the next tick, so attempts never overlap.

use crate::error::{LifecycleError, PollError};
use crate::models::{PollView, Snapshot};
use crate::sampler::Sampler;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::Instrument;

/// Anything that can produce one snapshot on demand.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, PollError>;
}

#[async_trait]
impl SnapshotSource for Sampler {
    async fn fetch(&self) -> Result<Snapshot, PollError> {
        Ok(self.sample().await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerStatus {
    Idle,
    Running,
    Stopped,
}

struct PollState {
    /// Bumped by stop(); results fetched under an older epoch are dropped.
    epoch: u64,
    status: PollerStatus,
    view: PollView,
    updates: watch::Sender<PollView>,
}

pub struct Poller {
    source: Arc<dyn SnapshotSource>,
    state: Arc<Mutex<PollState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(PollState {
                epoch: 0,
                status: PollerStatus::Idle,
                view: PollView::default(),
                updates: watch::Sender::new(PollView::default()),
            })),
            task: Mutex::new(None),
        }
    }

    pub fn current_view(&self) -> PollView {
        lock(&self.state).view.clone()
    }

    /// Receiver notified after every committed attempt.
    pub fn subscribe(&self) -> watch::Receiver<PollView> {
        lock(&self.state).updates.subscribe()
    }

    pub fn status(&self) -> PollerStatus {
        lock(&self.state).status
    }

    /// Spawn the polling loop. The first tick fires immediately, later ticks
    /// every `period` measured from the start of the previous one.
    pub fn start(&self, period: Duration) -> Result<(), LifecycleError> {
        let epoch = {
            let mut state = lock(&self.state);
            match state.status {
                PollerStatus::Running => return Err(LifecycleError::AlreadyRunning),
                PollerStatus::Stopped => return Err(LifecycleError::Stopped),
                PollerStatus::Idle => {}
            }
            state.status = PollerStatus::Running;
            state.epoch
        };

        let source = self.source.clone();
        let state = self.state.clone();
        let poll_span = tracing::debug_span!("poller", ?period);
        let handle = tokio::spawn(
            async move {
                let mut tick = interval(period);
                tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tick.tick().await;
                    let result = source.fetch().await;
                    if !commit(&state, epoch, result) {
                        break;
                    }
                }
            }
            .instrument(poll_span),
        );
        *lock(&self.task) = Some(handle);
        Ok(())
    }

    /// Run one attempt now and record its outcome. Returns false when the
    /// poller was stopped before the attempt settled (nothing recorded).
    pub async fn tick_once(&self) -> bool {
        let epoch = {
            let state = lock(&self.state);
            if state.status == PollerStatus::Stopped {
                return false;
            }
            state.epoch
        };
        let result = self.source.fetch().await;
        commit(&self.state, epoch, result)
    }

    /// Cancel the loop. Terminal: the view stays readable but never changes again.
    pub fn stop(&self) {
        {
            let mut state = lock(&self.state);
            state.epoch += 1;
            state.status = PollerStatus::Stopped;
        }
        if let Some(handle) = lock(&self.task).take() {
            handle.abort();
        }
        tracing::debug!("Poller stopped");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.task).take() {
            handle.abort();
        }
    }
}

/// Apply one attempt's result unless the poller moved to a newer epoch.
fn commit(state: &Mutex<PollState>, epoch: u64, result: Result<Snapshot, PollError>) -> bool {
    let mut state = lock(state);
    if state.epoch != epoch || state.status == PollerStatus::Stopped {
        return false;
    }
    match result {
        Ok(snapshot) => {
            tracing::debug!(cores = snapshot.cpu_usage.len(), "snapshot updated");
            state.view.snapshot = Some(snapshot);
            state.view.error = None;
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "fetch_snapshot",
                "Snapshot fetch failed; keeping last snapshot"
            );
            state.view.error = Some(e.to_string());
        }
    }
    let view = state.view.clone();
    state.updates.send_replace(view);
    true
}

/// The state holds plain data, so a poisoned lock is still consistent.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
