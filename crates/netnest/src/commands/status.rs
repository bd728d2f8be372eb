//! `status` command: current telemetry readings for one hub.

use tabled::Tabled;

use netnest_core::model::ReadingKind;
use netnest_core::{Reading, ReadingValue, SensorRegistry};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Reading")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Kind")]
    kind: String,
}

fn to_row(reading: &Reading, color: bool) -> ReadingRow {
    let value = match reading.value {
        ReadingValue::Connectivity(_) | ReadingValue::Status(_) => {
            output::paint_status(&reading.display_value(), color)
        }
        _ => reading.display_value(),
    };
    ReadingRow {
        key: reading.key.clone(),
        name: reading.name.clone(),
        value,
        kind: kind_label(reading.kind).to_owned(),
    }
}

fn kind_label(kind: ReadingKind) -> &'static str {
    match kind {
        ReadingKind::Scalar => "scalar",
        ReadingKind::Derived => "derived",
        ReadingKind::Device => "device",
    }
}

/// Fetch once and show the scalar and derived readings. Per-device
/// readings are the `devices` command's job.
pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, hub_config) = config::resolve_hub(global)?;
    let snapshot = util::fetch_snapshot(hub_config).await?;

    let registry = SensorRegistry::new();
    let all = registry.apply(&snapshot);
    let readings: Vec<Reading> = all.iter().filter(|r| !r.is_device()).cloned().collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &readings,
        |r| to_row(r, color),
        |r| format!("{} {}", r.key, r.display_value()),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
