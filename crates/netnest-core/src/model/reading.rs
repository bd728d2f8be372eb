// ── Published readings ──
//
// A `Reading` is one externally visible named value derived from a
// snapshot. The presentation metadata (class, unit, icon) mirrors what
// the hub's own dashboard shows for the same field.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::device::DeviceStatus;

/// Where a reading comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingKind {
    /// Taken verbatim from a top-level snapshot field.
    Scalar,
    /// Computed from other fields (the bandwidth down/up split).
    Derived,
    /// One entry per device record.
    Device,
}

/// Semantic class of a reading, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    DataRate,
    Connectivity,
    Duration,
}

/// How a reading's value evolves over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    TotalIncreasing,
}

/// Physical unit attached to a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    MegabitsPerSecond,
    Hours,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::MegabitsPerSecond => write!(f, "Mbit/s"),
            Unit::Hours => write!(f, "h"),
        }
    }
}

/// The value a reading carries.
///
/// `Unknown` means the field existed at some point but is absent from
/// the latest snapshot -- it is never conflated with zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingValue {
    Rate(f64),
    Count(u64),
    Connectivity(bool),
    Hours(f64),
    Status(DeviceStatus),
    Unknown,
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Rate(v) | ReadingValue::Hours(v) => write!(f, "{v}"),
            ReadingValue::Count(v) => write!(f, "{v}"),
            ReadingValue::Connectivity(up) => write!(f, "{}", if *up { "online" } else { "offline" }),
            ReadingValue::Status(s) => write!(f, "{s}"),
            ReadingValue::Unknown => write!(f, "unknown"),
        }
    }
}

/// Attributes published alongside a device reading, with the hub's
/// defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    pub device_type: String,
    pub ip_address: String,
    pub bandwidth: String,
    pub friendly_name: String,
}

/// One published value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Stable key: the snapshot field name for scalars, `device_{id}`
    /// for devices.
    pub key: String,
    /// Human-readable name (e.g. `"Network Bandwidth"`).
    pub name: String,
    pub kind: ReadingKind,
    pub value: ReadingValue,
    pub device_class: Option<DeviceClass>,
    pub state_class: Option<StateClass>,
    pub unit: Option<Unit>,
    /// Material Design icon name (`mdi:` prefix included).
    pub icon: &'static str,
    /// Present only for device readings.
    pub attributes: Option<DeviceAttributes>,
}

impl Reading {
    pub fn is_device(&self) -> bool {
        self.kind == ReadingKind::Device
    }

    /// Value with unit suffix for plain rendering (`"123.4 Mbit/s"`).
    pub fn display_value(&self) -> String {
        match self.unit {
            Some(unit) if self.value != ReadingValue::Unknown => {
                format!("{} {unit}", self.value)
            }
            _ => self.value.to_string(),
        }
    }
}
