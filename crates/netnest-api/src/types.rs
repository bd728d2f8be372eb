// Telemetry endpoint response types
//
// Models for the two NetworkNest cloud endpoints. Payloads are plain JSON
// objects (no envelope on success). Fields use `#[serde(default)]` liberally
// because the backend omits anything it has no data for rather than sending
// nulls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── States payload ───────────────────────────────────────────────────

/// Full telemetry object from `homeassistant-states`.
///
/// Scalar fields are all optional; a missing field means the backend had
/// no measurement, never zero. Unknown fields land in `extra` so a newer
/// backend doesn't break older clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatesPayload {
    /// Total throughput in Mbit/s.
    #[serde(default)]
    pub bandwidth: Option<f64>,
    #[serde(default)]
    pub bandwidth_down: Option<f64>,
    #[serde(default)]
    pub bandwidth_up: Option<f64>,
    #[serde(default)]
    pub connected_devices: Option<u64>,
    /// `"online"` / `"offline"`.
    #[serde(default)]
    pub network_status: Option<String>,
    /// Hub uptime in hours.
    #[serde(default)]
    pub uptime: Option<f64>,
    #[serde(default)]
    pub devices: Vec<DevicePayload>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One network-attached device inside a states payload.
///
/// `id` is the only field the rest of the system keys on; records without
/// one cannot be tracked across fetches and are skipped downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicePayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    /// `"online"` / `"offline"`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    /// Pre-formatted label such as `"23.5 MB/s"`; display-only.
    #[serde(default)]
    pub bandwidth: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Discovery payload ────────────────────────────────────────────────

/// Hub identity from `homeassistant-discovery`.
///
/// Used during credential validation and by the `discovery` command; the
/// entity/device manifests the endpoint also returns stay in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryInfo {
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sw_version: Option<String>,
    #[serde(default)]
    pub hw_version: Option<String>,
    #[serde(default)]
    pub configuration_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
