//! `refresh` command: on-demand fetch through the service layer.

use serde::Serialize;
use tabled::Tabled;

use netnest_core::{HubSet, ServiceCommand, ServiceOutcome, dispatch};

use crate::cli::{GlobalOpts, RefreshArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct RefreshSummary {
    hub: String,
    devices: usize,
    bandwidth_mbps: Option<f64>,
    network_status: Option<String>,
}

#[derive(Tabled)]
struct RefreshRow {
    #[tabled(rename = "Hub")]
    hub: String,
    #[tabled(rename = "Devices")]
    devices: usize,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
    #[tabled(rename = "Network")]
    network: String,
}

impl From<&RefreshSummary> for RefreshRow {
    fn from(summary: &RefreshSummary) -> Self {
        Self {
            hub: summary.hub.clone(),
            devices: summary.devices,
            bandwidth: summary
                .bandwidth_mbps
                .map_or_else(|| "-".to_owned(), |v| format!("{v} Mbit/s")),
            network: summary
                .network_status
                .clone()
                .unwrap_or_else(|| "-".to_owned()),
        }
    }
}

/// Refresh the active hub, or every configured hub with `--all`, then
/// summarize what each one now holds.
pub async fn handle(args: &RefreshArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let configs = if args.all {
        config::resolve_hub_scope(global)?
    } else {
        vec![config::resolve_hub(global)?]
    };
    let hubs = util::build_hub_set(configs)?;

    let result = run(&hubs, global).await;
    hubs.shutdown_all().await;
    result
}

async fn run(hubs: &HubSet, global: &GlobalOpts) -> Result<(), CliError> {
    let outcome = dispatch(hubs, ServiceCommand::RefreshNow { hub: None }).await?;
    let ServiceOutcome::Refreshed { hubs: refreshed } = outcome else {
        return Err(CliError::Api {
            message: "unexpected service outcome for refresh".into(),
            status: None,
        });
    };

    let mut summaries = Vec::with_capacity(refreshed.len());
    for name in &refreshed {
        let Some(hub) = hubs.get(name) else { continue };
        let Some(snapshot) = hub.coordinator().snapshot() else {
            continue;
        };
        summaries.push(RefreshSummary {
            hub: name.clone(),
            devices: snapshot.devices.len(),
            bandwidth_mbps: snapshot.bandwidth_mbps,
            network_status: snapshot.network_status.clone(),
        });
    }

    let out = output::render_list(&global.output, &summaries, |s| RefreshRow::from(s), |s| {
        s.hub.clone()
    });
    output::print_output(&out, global.quiet);
    if !global.quiet {
        eprintln!("✓ Refreshed {} hub(s)", refreshed.len());
    }
    Ok(())
}
