// ── Snapshot domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::device::Device;

/// The most recent complete fetch result.
///
/// Replaced wholesale on each successful poll, never merged field by
/// field. Absent scalars stay `None` -- the hub omitting a field is not
/// the same as the hub reporting zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub bandwidth_mbps: Option<f64>,
    pub bandwidth_down_mbps: Option<f64>,
    pub bandwidth_up_mbps: Option<f64>,
    pub connected_devices: Option<u64>,
    /// Raw status label from the hub (`"online"` / `"offline"`).
    pub network_status: Option<String>,
    pub uptime_hours: Option<f64>,
    pub devices: Vec<Device>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Hub fields we don't model. Preserved so nothing is lost.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Snapshot {
    /// Look up a device by id in this snapshot.
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Whether the hub reports the network as up.
    pub fn network_online(&self) -> Option<bool> {
        self.network_status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("online"))
    }
}
