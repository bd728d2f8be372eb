// ── Polling coordinator ──
//
// Lifecycle management for one hub connection: owns the API client,
// drives the periodic states fetch, and publishes results through the
// snapshot store. Fetches are single-flight; a failed fetch never
// disturbs previously stored data.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use netnest_api::{Client, DiscoveryInfo, TransportConfig};

use crate::config::HubConfig;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::store::SnapshotStore;

// ── HubState ─────────────────────────────────────────────────────────

/// Polling state observable by consumers.
///
/// `Uninitialized` until the first fetch begins; `Polling` while a
/// fetch is in flight; then `HasData` or `Failed` depending on the
/// outcome. `Failed` does not imply an empty store -- the last good
/// snapshot survives until a later fetch replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubState {
    Uninitialized,
    Polling,
    HasData,
    Failed,
}

impl HubState {
    pub fn is_healthy(self) -> bool {
        matches!(self, HubState::HasData)
    }
}

// ── Coordinator ──────────────────────────────────────────────────────

/// Fetch scheduler and snapshot publisher for one hub.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Construction builds
/// the API client but performs no I/O -- call
/// [`first_refresh()`](Self::first_refresh) to load data and
/// [`start_polling()`](Self::start_polling) for the periodic fetch loop.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: HubConfig,
    client: Client,
    store: SnapshotStore,
    state: watch::Sender<HubState>,
    /// Held for the duration of each fetch. A second `refresh()` caller
    /// queues here instead of issuing a concurrent request.
    flight: Mutex<()>,
    /// Message from the most recent failed fetch, cleared on success.
    last_error: StdMutex<Option<String>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator from hub configuration. Does NOT fetch.
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            ..TransportConfig::default()
        };
        let client = Client::new(config.base_url.as_str(), &config.api_key, transport)?;
        let (state, _) = watch::channel(HubState::Uninitialized);

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                client,
                store: SnapshotStore::new(),
                state,
                flight: Mutex::new(()),
                last_error: StdMutex::new(None),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the hub configuration.
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Fetch the current telemetry snapshot and publish it.
    ///
    /// Single-flight: concurrent callers serialize on an internal mutex,
    /// so at most one HTTP request is in flight per coordinator. Success
    /// replaces the stored snapshot atomically and notifies subscribers;
    /// failure records the error, leaves the last good snapshot in
    /// place, and returns the error to the caller.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let _flight = self.inner.flight.lock().await;
        let _ = self.inner.state.send(HubState::Polling);

        match self.inner.client.states().await {
            Ok(payload) => {
                let snapshot = Snapshot::from(payload);
                debug!(
                    devices = snapshot.devices.len(),
                    bandwidth = ?snapshot.bandwidth_mbps,
                    "snapshot fetched"
                );
                self.inner.store.store(snapshot);
                self.set_last_error(None);
                let _ = self.inner.state.send(HubState::HasData);
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.set_last_error(Some(err.to_string()));
                let _ = self.inner.state.send(HubState::Failed);
                Err(err)
            }
        }
    }

    /// Initial fetch at hub startup.
    ///
    /// Same single-flight semantics as [`refresh()`](Self::refresh); the
    /// distinction is contractual -- callers abort hub startup when this
    /// returns an error instead of waiting for the poll loop to recover.
    pub async fn first_refresh(&self) -> Result<(), CoreError> {
        self.refresh().await
    }

    /// Fetch the hub identity / entity manifest. Bypasses the store.
    pub async fn discovery(&self) -> Result<DiscoveryInfo, CoreError> {
        Ok(self.inner.client.discovery().await?)
    }

    // ── Polling lifecycle ────────────────────────────────────────────

    /// Spawn the periodic fetch loop at the configured `poll_interval`.
    ///
    /// No-op when the interval is zero (one-shot usage). Failed ticks
    /// are logged at warn and the loop keeps its cadence; there is no
    /// internal retry or backoff.
    pub async fn start_polling(&self) {
        let period = self.inner.config.poll_interval;
        if period.is_zero() {
            return;
        }

        let mut handles = self.inner.task_handles.lock().await;
        let coordinator = self.clone();
        let cancel = self.inner.cancel.child_token();
        handles.push(tokio::spawn(poll_task(coordinator, period, cancel)));
    }

    /// Stop polling, join background tasks, and release the HTTP session.
    ///
    /// Idempotent: repeat calls find nothing to cancel or join and the
    /// client close is itself a no-op the second time.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.client.close();
        debug!("coordinator shut down");
    }

    /// Token child for wiring auxiliary tasks to this coordinator's
    /// lifetime (cancelled by [`shutdown()`](Self::shutdown)).
    pub fn cancellation_child(&self) -> CancellationToken {
        self.inner.cancel.child_token()
    }

    pub(crate) async fn track_task(&self, handle: JoinHandle<()>) {
        self.inner.task_handles.lock().await.push(handle);
    }

    // ── State observation ────────────────────────────────────────────

    /// Current polling state.
    pub fn state(&self) -> HubState {
        *self.inner.state.borrow()
    }

    /// Subscribe to polling state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<HubState> {
        self.inner.state.subscribe()
    }

    /// Message from the most recent failed fetch, `None` after a success.
    pub fn last_error(&self) -> Option<String> {
        self.inner
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_last_error(&self, value: Option<String>) {
        *self
            .inner
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = value;
    }

    // ── Snapshot accessors (delegate to SnapshotStore) ───────────────

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.inner.store.subscribe()
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.inner.store.last_success()
    }

    pub fn data_age(&self) -> Option<TimeDelta> {
        self.inner.store.data_age()
    }

    /// Publish a locally edited snapshot without stamping a fetch.
    pub(crate) fn publish_edited(&self, snapshot: Arc<Snapshot>) {
        self.inner.store.swap(snapshot);
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

// ── Background task ──────────────────────────────────────────────────

async fn poll_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
    debug!("poll task stopped");
}
