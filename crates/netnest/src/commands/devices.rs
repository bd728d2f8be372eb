//! `devices` command: device inventory from the latest snapshot.

use tabled::Tabled;

use netnest_core::Device;

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
}

fn to_row(device: &Device, color: bool) -> DeviceRow {
    DeviceRow {
        id: device.id.clone(),
        name: device.display_name(),
        device_type: device.type_label().to_owned(),
        status: output::paint_status(&device.status.to_string(), color),
        ip: device.ip_label().to_owned(),
        bandwidth: device.bandwidth_display().to_owned(),
    }
}

/// Key/value rendering of one device.
pub(crate) fn detail(device: &Device) -> String {
    [
        format!("ID:        {}", device.id),
        format!("Name:      {}", device.display_name()),
        format!("Type:      {}", device.type_label()),
        format!("Status:    {}", device.status),
        format!("IP:        {}", device.ip_label()),
        format!("Bandwidth: {}", device.bandwidth_display()),
    ]
    .join("\n")
}

pub async fn handle(args: &DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, hub_config) = config::resolve_hub(global)?;
    let snapshot = util::fetch_snapshot(hub_config).await?;

    if let Some(ref id) = args.watch_id {
        let Some(device) = snapshot.device(id) else {
            return Err(CliError::not_found("device", id, "devices"));
        };
        let out = output::render_single(&global.output, device, detail, |d| d.id.clone());
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &snapshot.devices,
        |d| to_row(d, color),
        |d| d.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
