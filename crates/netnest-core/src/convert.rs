// ── API-to-domain type conversions ──
//
// Bridges raw `netnest_api` response types into canonical
// `netnest_core::model` domain types. Each `From` impl parses string
// fields into strong types and drops device records the hub sent
// without an id (nothing downstream can address them).

use tracing::warn;

use netnest_api::{DevicePayload, StatesPayload};

use crate::model::{Device, DeviceStatus, Snapshot};

impl From<DevicePayload> for Device {
    fn from(raw: DevicePayload) -> Self {
        let status = raw
            .status
            .as_deref()
            .map(DeviceStatus::parse)
            .unwrap_or_default();

        Device {
            id: raw.id,
            name: raw.name,
            device_type: raw.device_type,
            status,
            ip: raw.ip,
            bandwidth_label: raw.bandwidth,
            extra: raw.extra,
        }
    }
}

impl From<StatesPayload> for Snapshot {
    fn from(raw: StatesPayload) -> Self {
        let devices: Vec<Device> = raw
            .devices
            .into_iter()
            .filter(|d| {
                if d.id.is_empty() {
                    warn!("dropping device record without id");
                    return false;
                }
                true
            })
            .map(Device::from)
            .collect();

        Snapshot {
            bandwidth_mbps: raw.bandwidth,
            bandwidth_down_mbps: raw.bandwidth_down,
            bandwidth_up_mbps: raw.bandwidth_up,
            connected_devices: raw.connected_devices,
            network_status: raw.network_status,
            uptime_hours: raw.uptime,
            devices,
            last_updated: raw.last_updated,
            extra: raw.extra,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn states_from(value: serde_json::Value) -> Snapshot {
        let payload: StatesPayload = serde_json::from_value(value).unwrap();
        Snapshot::from(payload)
    }

    #[test]
    fn full_payload_converts() {
        let snapshot = states_from(json!({
            "bandwidth": 123.45,
            "bandwidth_down": 98.76,
            "bandwidth_up": 24.69,
            "connected_devices": 5,
            "network_status": "online",
            "uptime": 168.5,
            "devices": [
                {"id": "device_1", "name": "Living Room TV", "type": "Smart TV",
                 "ip": "192.168.1.100", "status": "online", "bandwidth": "42.5 MB/s"},
            ],
            "last_updated": "2025-06-01T12:00:00Z",
        }));

        assert_eq!(snapshot.bandwidth_mbps, Some(123.45));
        assert_eq!(snapshot.connected_devices, Some(5));
        assert_eq!(snapshot.network_online(), Some(true));
        assert_eq!(snapshot.devices.len(), 1);

        let tv = snapshot.device("device_1").unwrap();
        assert_eq!(tv.status, DeviceStatus::Online);
        assert_eq!(tv.bandwidth_label.as_deref(), Some("42.5 MB/s"));
    }

    #[test]
    fn absent_scalars_stay_absent() {
        let snapshot = states_from(json!({"devices": []}));
        assert_eq!(snapshot.bandwidth_mbps, None);
        assert_eq!(snapshot.connected_devices, None);
        assert_eq!(snapshot.uptime_hours, None);
        assert_eq!(snapshot.network_online(), None);
    }

    #[test]
    fn device_without_id_is_dropped() {
        let snapshot = states_from(json!({
            "devices": [
                {"name": "ghost"},
                {"id": "device_1", "status": "offline"},
            ],
        }));
        assert_eq!(snapshot.devices.len(), 1);
        assert_eq!(snapshot.devices[0].id, "device_1");
        assert_eq!(snapshot.devices[0].status, DeviceStatus::Offline);
    }

    #[test]
    fn unmodeled_fields_survive_conversion() {
        let snapshot = states_from(json!({
            "bandwidth": 10.0,
            "wan_ip": "203.0.113.7",
        }));
        assert_eq!(
            snapshot.extra.get("wan_ip").and_then(|v| v.as_str()),
            Some("203.0.113.7")
        );
    }

    #[test]
    fn device_status_default_is_unknown() {
        let snapshot = states_from(json!({
            "devices": [{"id": "d1"}],
        }));
        assert_eq!(snapshot.devices[0].status, DeviceStatus::Unknown);
    }
}
