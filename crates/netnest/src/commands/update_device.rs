//! `update-device` command: edit a device's cached name or type.
//!
//! The edit is a snapshot rewrite, not an HTTP call; it lasts until the
//! next poll replaces the snapshot. Without `--hub` every configured
//! hub holding the device is touched.

use netnest_core::{HubSet, ServiceCommand, ServiceOutcome, dispatch};

use crate::cli::{GlobalOpts, UpdateDeviceArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{devices, util};

pub async fn handle(args: UpdateDeviceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.name.is_none() && args.device_type.is_none() {
        return Err(CliError::Validation {
            field: "update-device".into(),
            reason: "provide --name and/or --type".into(),
        });
    }

    let configs = if global.hub.is_some() {
        vec![config::resolve_hub(global)?]
    } else {
        config::resolve_hub_scope(global)?
    };
    let hubs = util::build_hub_set(configs)?;

    let result = run(&hubs, args, global).await;
    hubs.shutdown_all().await;
    result
}

async fn run(hubs: &HubSet, args: UpdateDeviceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // The edit works on cached snapshots; load them first.
    dispatch(hubs, ServiceCommand::RefreshNow { hub: None }).await?;

    let outcome = dispatch(
        hubs,
        ServiceCommand::UpdateDevice {
            hub: global.hub.clone(),
            device_id: args.id,
            name: args.name,
            device_type: args.device_type,
        },
    )
    .await?;

    let ServiceOutcome::DeviceUpdated { device_id, hubs: touched } = outcome else {
        return Err(CliError::Api {
            message: "unexpected service outcome for update-device".into(),
            status: None,
        });
    };

    // Show the record as it now stands on the first touched hub.
    let updated = touched
        .first()
        .and_then(|name| hubs.get(name))
        .and_then(|hub| hub.coordinator().snapshot())
        .and_then(|snapshot| snapshot.device(&device_id).cloned());
    if let Some(device) = updated {
        let out = output::render_single(&global.output, &device, devices::detail, |d| {
            d.id.clone()
        });
        output::print_output(&out, global.quiet);
    }

    if !global.quiet {
        eprintln!("✓ Updated device '{device_id}' on: {}", touched.join(", "));
    }
    Ok(())
}
