// ── Hub assembly ──
//
// A `Hub` bundles the pieces that make one configured connection live:
// the polling coordinator and the sensor registry, bridged by a
// background task. `HubSet` is the composition-root collection the
// service layer dispatches against.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::config::HubConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::Reading;
use crate::sensors::{SensorRegistry, registry_task};

/// One configured hub: coordinator + sensor registry.
///
/// Construction is pure; [`start()`](Self::start) performs the first
/// fetch and spawns the background loop.
pub struct Hub {
    name: String,
    coordinator: Coordinator,
    registry: Arc<SensorRegistry>,
}

impl Hub {
    pub fn new(name: impl Into<String>, config: HubConfig) -> Result<Self, CoreError> {
        Ok(Self {
            name: name.into(),
            coordinator: Coordinator::new(config)?,
            registry: Arc::new(SensorRegistry::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn registry(&self) -> &Arc<SensorRegistry> {
        &self.registry
    }

    /// Bring the hub live: wire the registry to the snapshot stream,
    /// load initial data, and begin periodic polling.
    ///
    /// Fails when the first fetch fails -- the hub is then not polling
    /// and the caller should [`shutdown()`](Self::shutdown) it.
    pub async fn start(&self) -> Result<(), CoreError> {
        // Subscribe before the first fetch so the registry task sees it.
        let task = tokio::spawn(registry_task(
            Arc::clone(&self.registry),
            self.coordinator.subscribe(),
            self.coordinator.cancellation_child(),
        ));
        self.coordinator.track_task(task).await;

        self.coordinator.first_refresh().await?;
        self.coordinator.start_polling().await;
        debug!(hub = %self.name, "hub started");
        Ok(())
    }

    /// Stop polling and release resources. Idempotent.
    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
    }

    /// Current reading set published by the registry.
    pub fn readings(&self) -> Arc<Vec<Reading>> {
        self.registry.readings()
    }

    /// Subscribe to reading set changes.
    pub fn subscribe_readings(&self) -> watch::Receiver<Arc<Vec<Reading>>> {
        self.registry.subscribe()
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("name", &self.name)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

// ── HubSet ───────────────────────────────────────────────────────────

/// Named collection of hubs, iterated in name order.
///
/// Owned by the composition root (the CLI); the service layer borrows
/// it for dispatch.
#[derive(Debug, Default)]
pub struct HubSet {
    hubs: BTreeMap<String, Hub>,
}

impl HubSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hub, keyed by its name.
    pub fn insert(&mut self, hub: Hub) {
        self.hubs.insert(hub.name().to_owned(), hub);
    }

    pub fn get(&self, name: &str) -> Option<&Hub> {
        self.hubs.get(name)
    }

    /// Hubs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Hub> {
        self.hubs.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.hubs.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.hubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }

    /// Shut every hub down. Idempotent per hub.
    pub async fn shutdown_all(&self) {
        for hub in self.hubs.values() {
            hub.shutdown().await;
        }
    }
}

impl FromIterator<Hub> for HubSet {
    fn from_iter<I: IntoIterator<Item = Hub>>(iter: I) -> Self {
        let mut set = Self::new();
        for hub in iter {
            set.insert(hub);
        }
        set
    }
}
