// ── Device domain types ──

use serde::{Deserialize, Serialize};

/// Device operational status as reported by the hub.
///
/// Anything the hub reports that is neither `online` nor `offline`
/// (including an absent field) lands on `Unknown`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl DeviceStatus {
    /// Parse a status label case-insensitively, treating anything
    /// unrecognized as `Unknown` rather than failing.
    pub fn parse(label: &str) -> Self {
        label.parse().unwrap_or(Self::Unknown)
    }

    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// One network-attached device within a snapshot.
///
/// Lifetime is bound to the snapshot that carries it; identity across
/// snapshots is by `id` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub status: DeviceStatus,
    pub ip: Option<String>,
    /// Per-device throughput as the hub formats it (e.g. `"42.5 MB/s"`).
    /// Kept as a label -- the hub controls the unit and precision.
    pub bandwidth_label: Option<String>,
    /// Hub fields we don't model. Preserved so nothing is lost.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Device {
    /// Display name, falling back to `Device {id}` when the hub sent none.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Device {}", self.id))
    }

    /// Device type label, `"unknown"` when absent.
    pub fn type_label(&self) -> &str {
        self.device_type.as_deref().unwrap_or("unknown")
    }

    /// IP address label, `"unknown"` when absent.
    pub fn ip_label(&self) -> &str {
        self.ip.as_deref().unwrap_or("unknown")
    }

    /// Throughput label, `"0 MB/s"` when absent.
    pub fn bandwidth_display(&self) -> &str {
        self.bandwidth_label.as_deref().unwrap_or("0 MB/s")
    }
}
