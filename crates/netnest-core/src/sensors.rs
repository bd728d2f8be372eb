// ── Sensor registry ──
//
// Keeps the published reading set alive across snapshots. The mapping
// layer is stateless; this registry adds the entity lifecycle:
//
// - a scalar reading once seen reports `Unknown` when its field later
//   disappears from the snapshot, instead of vanishing;
// - a device once seen keeps its last-known values while missing from
//   the latest snapshot;
// - a device present in the latest snapshot always reports that
//   snapshot's status (last write wins, matched by id).

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::mapping::{derived_bandwidth, device_reading, scalar_readings};
use crate::model::{Device, Reading, ReadingValue, Snapshot};

/// Fixed output order for scalar and derived readings, stable across
/// field appearance and disappearance.
const SCALAR_KEY_ORDER: [&str; 6] = [
    "bandwidth",
    "connected_devices",
    "network_status",
    "uptime",
    "bandwidth_down",
    "bandwidth_up",
];

/// Reading set publisher for one hub.
pub struct SensorRegistry {
    /// Last live reading per scalar key, kept as the metadata source
    /// when the field disappears.
    scalars: DashMap<String, Reading>,
    /// Freshest known record per device id.
    devices: DashMap<String, Device>,
    readings: watch::Sender<Arc<Vec<Reading>>>,
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorRegistry {
    pub fn new() -> Self {
        let (readings, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            scalars: DashMap::new(),
            devices: DashMap::new(),
            readings,
        }
    }

    /// Recompute the reading set from a snapshot and publish it.
    pub fn apply(&self, snapshot: &Snapshot) -> Arc<Vec<Reading>> {
        let live: Vec<Reading> = {
            let mut readings = scalar_readings(snapshot);
            readings.extend(derived_bandwidth(snapshot));
            readings
        };

        for reading in &live {
            self.scalars.insert(reading.key.clone(), reading.clone());
        }
        for device in &snapshot.devices {
            self.devices.insert(device.id.clone(), device.clone());
        }

        let mut out: Vec<Reading> = Vec::new();
        for key in SCALAR_KEY_ORDER {
            if let Some(reading) = live.iter().find(|r| r.key == key) {
                out.push(reading.clone());
            } else if let Some(memo) = self.scalars.get(key) {
                out.push(Reading {
                    value: ReadingValue::Unknown,
                    ..memo.clone()
                });
            }
        }

        let mut ids: Vec<String> = self.devices.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        for id in &ids {
            if let Some(device) = self.devices.get(id) {
                out.push(device_reading(&device));
            }
        }

        let out = Arc::new(out);
        self.readings
            .send_modify(|slot| *slot = Arc::clone(&out));
        out
    }

    /// Current reading set (cheap `Arc` clone).
    pub fn readings(&self) -> Arc<Vec<Reading>> {
        self.readings.borrow().clone()
    }

    /// Subscribe to reading set changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Reading>>> {
        self.readings.subscribe()
    }
}

/// Bridge task: snapshot changes → registry recompute.
///
/// Runs until the token is cancelled or the snapshot channel closes.
pub(crate) async fn registry_task(
    registry: Arc<SensorRegistry>,
    mut snapshots: watch::Receiver<Option<Arc<Snapshot>>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    let readings = registry.apply(&snapshot);
                    debug!(count = readings.len(), "reading set recomputed");
                }
            }
        }
    }
    debug!("registry task stopped");
}
