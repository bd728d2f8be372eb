// ── Service dispatch ──
//
// The two externally invokable operations, routed against a `HubSet`.
// Mirrors the command pattern used for controller mutations: a typed
// request enum in, a typed outcome out, `CoreError` for every failure.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::hub::{Hub, HubSet};

/// A service invocation.
///
/// `hub: None` targets every configured hub; `Some(name)` targets that
/// hub only and fails with [`CoreError::HubNotFound`] when no such hub
/// exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCommand {
    /// Fetch fresh data immediately instead of waiting for the next
    /// scheduled tick.
    RefreshNow { hub: Option<String> },
    /// Rewrite the cached `name` / `type` of one device in the current
    /// snapshot and notify subscribers. No HTTP fetch is involved; the
    /// edit lasts until the next poll replaces the snapshot.
    UpdateDevice {
        hub: Option<String>,
        device_id: String,
        name: Option<String>,
        device_type: Option<String>,
    },
}

/// What a dispatched command accomplished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// Hubs whose refresh succeeded.
    Refreshed { hubs: Vec<String> },
    /// Hubs in which the device was found and edited.
    DeviceUpdated { device_id: String, hubs: Vec<String> },
}

/// Route a command to the targeted hub(s).
pub async fn dispatch(hubs: &HubSet, command: ServiceCommand) -> Result<ServiceOutcome, CoreError> {
    match command {
        ServiceCommand::RefreshNow { hub } => refresh_now(hubs, hub.as_deref()).await,
        ServiceCommand::UpdateDevice {
            hub,
            device_id,
            name,
            device_type,
        } => update_device(hubs, hub.as_deref(), &device_id, name, device_type),
    }
}

/// Resolve a scope to concrete hubs: the named one, or all of them.
fn resolve_scope<'a>(hubs: &'a HubSet, scope: Option<&str>) -> Result<Vec<&'a Hub>, CoreError> {
    match scope {
        Some(name) => {
            let hub = hubs.get(name).ok_or_else(|| CoreError::HubNotFound {
                name: name.to_owned(),
            })?;
            Ok(vec![hub])
        }
        None => {
            if hubs.is_empty() {
                return Err(CoreError::Config {
                    message: "no hubs configured".into(),
                });
            }
            Ok(hubs.iter().collect())
        }
    }
}

async fn refresh_now(hubs: &HubSet, scope: Option<&str>) -> Result<ServiceOutcome, CoreError> {
    let targets = resolve_scope(hubs, scope)?;

    let results = join_all(targets.iter().map(|hub| async {
        (hub.name(), hub.coordinator().refresh().await)
    }))
    .await;

    let mut refreshed = Vec::new();
    let mut first_error = None;
    for (name, result) in results {
        match result {
            Ok(()) => refreshed.push(name.to_owned()),
            Err(e) => {
                warn!(hub = %name, error = %e, "manual refresh failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    // Partial success counts as success; the per-hub failures are in
    // the log and the outcome lists who actually refreshed.
    match (refreshed.is_empty(), first_error) {
        (true, Some(e)) => Err(e),
        _ => Ok(ServiceOutcome::Refreshed { hubs: refreshed }),
    }
}

fn update_device(
    hubs: &HubSet,
    scope: Option<&str>,
    device_id: &str,
    name: Option<String>,
    device_type: Option<String>,
) -> Result<ServiceOutcome, CoreError> {
    if device_id.trim().is_empty() {
        return Err(CoreError::Config {
            message: "update-device requires a device id".into(),
        });
    }

    let targets = resolve_scope(hubs, scope)?;

    let mut touched = Vec::new();
    for hub in targets {
        let Some(current) = hub.coordinator().snapshot() else {
            continue;
        };
        if current.device(device_id).is_none() {
            continue;
        }

        let mut edited = (*current).clone();
        for device in &mut edited.devices {
            if device.id == device_id {
                if let Some(ref value) = name {
                    device.name = Some(value.clone());
                }
                if let Some(ref value) = device_type {
                    device.device_type = Some(value.clone());
                }
            }
        }
        hub.coordinator().publish_edited(Arc::new(edited));
        info!(hub = %hub.name(), device = %device_id, "device record updated");
        touched.push(hub.name().to_owned());
    }

    if touched.is_empty() {
        return Err(CoreError::DeviceNotFound {
            id: device_id.to_owned(),
        });
    }

    Ok(ServiceOutcome::DeviceUpdated {
        device_id: device_id.to_owned(),
        hubs: touched,
    })
}
