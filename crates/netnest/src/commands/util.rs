//! Shared plumbing for command handlers.

use std::sync::Arc;

use netnest_core::{Coordinator, DiscoveryInfo, Hub, HubConfig, HubSet, Snapshot};

use crate::error::CliError;

/// One-shot fetch: construct a coordinator, refresh once, return the
/// snapshot. The coordinator is torn down on every path.
pub async fn fetch_snapshot(config: HubConfig) -> Result<Arc<Snapshot>, CliError> {
    let coordinator = Coordinator::new(config)?;
    let result = coordinator.refresh().await;
    let snapshot = coordinator.snapshot();
    coordinator.shutdown().await;

    result?;
    snapshot.ok_or_else(|| CliError::Api {
        message: "refresh reported success but produced no snapshot".into(),
        status: None,
    })
}

/// One-shot discovery metadata fetch.
pub async fn fetch_discovery(config: HubConfig) -> Result<DiscoveryInfo, CliError> {
    let coordinator = Coordinator::new(config)?;
    let result = coordinator.discovery().await;
    coordinator.shutdown().await;
    Ok(result?)
}

/// Assemble an unstarted hub set from resolved configs.
pub fn build_hub_set(configs: Vec<(String, HubConfig)>) -> Result<HubSet, CliError> {
    let mut hubs = HubSet::new();
    for (name, config) in configs {
        hubs.insert(Hub::new(name, config)?);
    }
    Ok(hubs)
}
