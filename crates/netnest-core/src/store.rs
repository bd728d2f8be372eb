// ── Snapshot store ──
//
// Reactive single-slot storage for the latest snapshot, built on
// `tokio::sync::watch`. Consumers either read the current value or
// subscribe for change notification; they never observe a torn or
// partially applied snapshot.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;

use crate::model::Snapshot;

/// Holds the most recent successful snapshot for one hub.
///
/// `None` until the first successful fetch. A failed fetch never
/// touches the stored value.
pub struct SnapshotStore {
    snapshot: watch::Sender<Option<Arc<Snapshot>>>,
    last_success: watch::Sender<Option<DateTime<Utc>>>,
}

impl SnapshotStore {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (last_success, _) = watch::channel(None);
        Self {
            snapshot,
            last_success,
        }
    }

    /// Current snapshot (cheap `Arc` clone), `None` before the first
    /// successful fetch.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.snapshot.subscribe()
    }

    /// When the last successful fetch completed.
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        *self.last_success.borrow()
    }

    /// Age of the stored data, `None` before the first success.
    pub fn data_age(&self) -> Option<TimeDelta> {
        self.last_success().map(|t| Utc::now() - t)
    }

    /// Store a freshly fetched snapshot and stamp the success time.
    pub(crate) fn store(&self, snapshot: Snapshot) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot
            .send_modify(|slot| *slot = Some(Arc::new(snapshot)));
        self.last_success.send_modify(|t| *t = Some(Utc::now()));
    }

    /// Replace the snapshot without stamping a fetch success.
    ///
    /// Used by the service layer to publish local edits -- subscribers
    /// get a change notification, but `data_age()` still reflects the
    /// last actual fetch.
    pub(crate) fn swap(&self, snapshot: Arc<Snapshot>) {
        self.snapshot.send_modify(|slot| *slot = Some(snapshot));
    }
}
