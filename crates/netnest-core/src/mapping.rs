// ── Snapshot-to-reading mapping ──
//
// Pure functions from a snapshot to the set of published readings.
// Absent fields yield no reading; they never surface as zero. All
// persistence across snapshots (entities that outlive their field)
// lives in `sensors::SensorRegistry`, not here.

use crate::model::{
    Device, DeviceAttributes, DeviceClass, Reading, ReadingKind, ReadingValue, Snapshot,
    StateClass, Unit,
};

/// Share of total bandwidth attributed to downlink when the hub does
/// not report an explicit split. A fixed approximation, not a
/// measurement.
pub const DOWNLINK_SHARE: f64 = 0.7;
/// Uplink counterpart of [`DOWNLINK_SHARE`].
pub const UPLINK_SHARE: f64 = 0.3;

/// Icon for a device type label, matching the hub dashboard's choices.
pub fn device_icon(device_type: &str) -> &'static str {
    match device_type {
        "Computer" => "mdi:laptop",
        "Mobile" => "mdi:phone",
        "Smart TV" => "mdi:television",
        "Gaming" => "mdi:gamepad-variant",
        "Network" => "mdi:router-wireless",
        "Tablet" => "mdi:tablet",
        "Smart Speaker" => "mdi:speaker",
        "IoT Device" => "mdi:camera",
        "Router" => "mdi:router",
        "Switch" => "mdi:switch",
        "Access Point" => "mdi:wifi",
        _ => "mdi:devices",
    }
}

fn scalar(
    key: &str,
    name: &str,
    value: ReadingValue,
    device_class: Option<DeviceClass>,
    state_class: Option<StateClass>,
    unit: Option<Unit>,
    icon: &'static str,
) -> Reading {
    Reading {
        key: key.into(),
        name: name.into(),
        kind: ReadingKind::Scalar,
        value,
        device_class,
        state_class,
        unit,
        icon,
        attributes: None,
    }
}

/// One reading per scalar field present in the snapshot.
pub fn scalar_readings(snapshot: &Snapshot) -> Vec<Reading> {
    let mut readings = Vec::with_capacity(4);

    if let Some(rate) = snapshot.bandwidth_mbps {
        readings.push(scalar(
            "bandwidth",
            "Network Bandwidth",
            ReadingValue::Rate(rate),
            Some(DeviceClass::DataRate),
            Some(StateClass::Measurement),
            Some(Unit::MegabitsPerSecond),
            "mdi:speedometer",
        ));
    }

    if let Some(count) = snapshot.connected_devices {
        readings.push(scalar(
            "connected_devices",
            "Connected Devices",
            ReadingValue::Count(count),
            None,
            Some(StateClass::Measurement),
            None,
            "mdi:devices",
        ));
    }

    if let Some(online) = snapshot.network_online() {
        readings.push(scalar(
            "network_status",
            "Network Status",
            ReadingValue::Connectivity(online),
            Some(DeviceClass::Connectivity),
            None,
            None,
            "mdi:network",
        ));
    }

    if let Some(hours) = snapshot.uptime_hours {
        readings.push(scalar(
            "uptime",
            "Network Uptime",
            ReadingValue::Hours(hours),
            Some(DeviceClass::Duration),
            Some(StateClass::TotalIncreasing),
            Some(Unit::Hours),
            "mdi:clock-outline",
        ));
    }

    readings
}

/// The bandwidth down/up pair.
///
/// Prefers the hub's explicit split; when only the total is reported,
/// derives the pair as [`DOWNLINK_SHARE`] / [`UPLINK_SHARE`] of it.
/// Emits nothing when neither source field is present.
pub fn derived_bandwidth(snapshot: &Snapshot) -> Vec<Reading> {
    let mut readings = Vec::with_capacity(2);

    let down = snapshot
        .bandwidth_down_mbps
        .or(snapshot.bandwidth_mbps.map(|b| b * DOWNLINK_SHARE));
    if let Some(rate) = down {
        readings.push(Reading {
            key: "bandwidth_down".into(),
            name: "Network Bandwidth Down".into(),
            kind: ReadingKind::Derived,
            value: ReadingValue::Rate(rate),
            device_class: Some(DeviceClass::DataRate),
            state_class: Some(StateClass::Measurement),
            unit: Some(Unit::MegabitsPerSecond),
            icon: "mdi:download",
            attributes: None,
        });
    }

    let up = snapshot
        .bandwidth_up_mbps
        .or(snapshot.bandwidth_mbps.map(|b| b * UPLINK_SHARE));
    if let Some(rate) = up {
        readings.push(Reading {
            key: "bandwidth_up".into(),
            name: "Network Bandwidth Up".into(),
            kind: ReadingKind::Derived,
            value: ReadingValue::Rate(rate),
            device_class: Some(DeviceClass::DataRate),
            state_class: Some(StateClass::Measurement),
            unit: Some(Unit::MegabitsPerSecond),
            icon: "mdi:upload",
            attributes: None,
        });
    }

    readings
}

/// Build the reading for one device record.
pub fn device_reading(device: &Device) -> Reading {
    Reading {
        key: format!("device_{}", device.id),
        name: format!("NetworkNest {}", device.display_name()),
        kind: ReadingKind::Device,
        value: ReadingValue::Status(device.status),
        device_class: None,
        state_class: None,
        unit: None,
        icon: device_icon(device.type_label()),
        attributes: Some(DeviceAttributes {
            device_type: device.type_label().to_owned(),
            ip_address: device.ip_label().to_owned(),
            bandwidth: device.bandwidth_display().to_owned(),
            friendly_name: device
                .name
                .clone()
                .unwrap_or_else(|| "Unknown Device".to_owned()),
        }),
    }
}

/// One reading per device record in the snapshot.
pub fn device_readings(snapshot: &Snapshot) -> Vec<Reading> {
    snapshot.devices.iter().map(device_reading).collect()
}

/// Full reading set for one snapshot: scalars, the bandwidth pair,
/// then devices.
pub fn all_readings(snapshot: &Snapshot) -> Vec<Reading> {
    let mut readings = scalar_readings(snapshot);
    readings.extend(derived_bandwidth(snapshot));
    readings.extend(device_readings(snapshot));
    readings
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::DeviceStatus;
    use serde_json::json;

    fn snapshot_from(value: serde_json::Value) -> Snapshot {
        let payload: netnest_api::StatesPayload = serde_json::from_value(value).unwrap();
        Snapshot::from(payload)
    }

    fn rate_of(readings: &[Reading], key: &str) -> f64 {
        match readings.iter().find(|r| r.key == key).unwrap().value {
            ReadingValue::Rate(v) => v,
            ref other => panic!("expected rate for {key}, got {other:?}"),
        }
    }

    #[test]
    fn total_bandwidth_splits_seventy_thirty() {
        let snapshot = snapshot_from(json!({"bandwidth": 100.0}));
        let readings = derived_bandwidth(&snapshot);

        assert_eq!(readings.len(), 2);
        assert!((rate_of(&readings, "bandwidth_down") - 70.0).abs() < 1e-9);
        assert!((rate_of(&readings, "bandwidth_up") - 30.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_split_wins_over_derivation() {
        let snapshot = snapshot_from(json!({
            "bandwidth": 100.0,
            "bandwidth_down": 80.0,
            "bandwidth_up": 20.0,
        }));
        let readings = derived_bandwidth(&snapshot);

        assert!((rate_of(&readings, "bandwidth_down") - 80.0).abs() < 1e-9);
        assert!((rate_of(&readings, "bandwidth_up") - 20.0).abs() < 1e-9);
    }

    #[test]
    fn no_bandwidth_means_no_derived_pair() {
        let snapshot = snapshot_from(json!({"connected_devices": 3}));
        assert!(derived_bandwidth(&snapshot).is_empty());
    }

    #[test]
    fn four_scalars_produce_exactly_four_readings() {
        let snapshot = snapshot_from(json!({
            "bandwidth": 123.4,
            "connected_devices": 5,
            "network_status": "online",
            "uptime": 168.5,
        }));

        let scalars = scalar_readings(&snapshot);
        assert_eq!(scalars.len(), 4);
        assert!(scalars.iter().all(|r| r.kind == ReadingKind::Scalar));
        assert!(device_readings(&snapshot).is_empty());

        // No absent field surfaces as a zero-valued reading.
        assert!(
            !scalars
                .iter()
                .any(|r| matches!(r.value, ReadingValue::Rate(v) if v == 0.0))
        );
    }

    #[test]
    fn absent_scalars_produce_no_readings() {
        let snapshot = snapshot_from(json!({"network_status": "offline"}));
        let scalars = scalar_readings(&snapshot);

        assert_eq!(scalars.len(), 1);
        assert_eq!(scalars[0].key, "network_status");
        assert_eq!(scalars[0].value, ReadingValue::Connectivity(false));
    }

    #[test]
    fn device_reading_applies_hub_defaults() {
        let snapshot = snapshot_from(json!({
            "devices": [{"id": "d7", "status": "online"}],
        }));
        let readings = device_readings(&snapshot);

        assert_eq!(readings.len(), 1);
        let reading = &readings[0];
        assert_eq!(reading.key, "device_d7");
        assert_eq!(reading.name, "NetworkNest Device d7");
        assert_eq!(reading.value, ReadingValue::Status(DeviceStatus::Online));
        assert_eq!(reading.icon, "mdi:devices");

        let attrs = reading.attributes.as_ref().unwrap();
        assert_eq!(attrs.device_type, "unknown");
        assert_eq!(attrs.ip_address, "unknown");
        assert_eq!(attrs.bandwidth, "0 MB/s");
        assert_eq!(attrs.friendly_name, "Unknown Device");
    }

    #[test]
    fn device_icon_table_matches_dashboard() {
        assert_eq!(device_icon("Computer"), "mdi:laptop");
        assert_eq!(device_icon("Smart TV"), "mdi:television");
        assert_eq!(device_icon("Gaming"), "mdi:gamepad-variant");
        assert_eq!(device_icon("Access Point"), "mdi:wifi");
        assert_eq!(device_icon("Toaster"), "mdi:devices");
    }

    #[test]
    fn all_readings_orders_scalars_pair_devices() {
        let snapshot = snapshot_from(json!({
            "bandwidth": 50.0,
            "devices": [{"id": "d1", "name": "TV", "type": "Smart TV", "status": "online"}],
        }));
        let readings = all_readings(&snapshot);

        let kinds: Vec<ReadingKind> = readings.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReadingKind::Scalar,
                ReadingKind::Derived,
                ReadingKind::Derived,
                ReadingKind::Device,
            ]
        );
    }
}
