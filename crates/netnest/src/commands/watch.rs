//! `watch` command: stream reading changes until interrupted.
//!
//! Brings every hub in scope live (first fetch + periodic polling) and
//! prints each reading change as it is published. A hub whose first
//! fetch fails is sidelined with a warning; the watch only aborts when
//! no hub at all comes up.

use std::collections::HashMap;
use std::sync::Arc;

use owo_colors::OwoColorize;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use netnest_core::{Reading, ReadingValue};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let configs = if global.hub.is_some() {
        vec![config::resolve_hub(global)?]
    } else {
        config::resolve_hub_scope(global)?
    };
    let hubs = util::build_hub_set(configs)?;

    let mut live = Vec::new();
    let mut first_error: Option<CliError> = None;
    for hub in hubs.iter() {
        match hub.start().await {
            Ok(()) => live.push(hub),
            Err(e) => {
                warn!(hub = %hub.name(), error = %e, "hub failed to start, skipping");
                hub.shutdown().await;
                if first_error.is_none() {
                    first_error = Some(e.into());
                }
            }
        }
    }
    if live.is_empty() {
        hubs.shutdown_all().await;
        return Err(first_error.unwrap_or_else(|| CliError::Validation {
            field: "hub".into(),
            reason: "no hubs to watch".into(),
        }));
    }

    let color = output::should_color(&global.color);
    let cancel = CancellationToken::new();
    let mut tasks = Vec::with_capacity(live.len());
    for hub in &live {
        tasks.push(tokio::spawn(stream_readings(
            hub.name().to_owned(),
            hub.subscribe_readings(),
            global.output.clone(),
            color,
            cancel.child_token(),
        )));
    }

    if !global.quiet {
        eprintln!("Watching {} hub(s), Ctrl-C to stop", live.len());
    }

    tokio::signal::ctrl_c().await?;

    cancel.cancel();
    for task in tasks {
        let _ = task.await;
    }
    hubs.shutdown_all().await;

    if !global.quiet {
        eprintln!("✓ Stopped");
    }
    Ok(())
}

/// Print one hub's current readings, then every change, until canceled.
async fn stream_readings(
    hub: String,
    mut readings: watch::Receiver<Arc<Vec<Reading>>>,
    format: OutputFormat,
    color: bool,
    cancel: CancellationToken,
) {
    let mut seen: HashMap<String, ReadingValue> = HashMap::new();

    let initial = Arc::clone(&readings.borrow_and_update());
    print_changes(&hub, &initial, &mut seen, &format, color);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = readings.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = Arc::clone(&readings.borrow_and_update());
                print_changes(&hub, &current, &mut seen, &format, color);
            }
        }
    }
}

fn print_changes(
    hub: &str,
    readings: &[Reading],
    seen: &mut HashMap<String, ReadingValue>,
    format: &OutputFormat,
    color: bool,
) {
    for reading in readings {
        if seen.get(&reading.key) == Some(&reading.value) {
            continue;
        }
        seen.insert(reading.key.clone(), reading.value);
        print_change(hub, reading, format, color);
    }
}

#[derive(Serialize)]
struct ChangeEvent<'a> {
    hub: &'a str,
    #[serde(flatten)]
    reading: &'a Reading,
}

fn print_change(hub: &str, reading: &Reading, format: &OutputFormat, color: bool) {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let event = ChangeEvent { hub, reading };
            println!("{}", output::render_json_compact(&event));
        }
        OutputFormat::Plain => {
            println!("{hub}\t{}\t{}", reading.key, reading.display_value());
        }
        OutputFormat::Table => {
            let time = chrono::Local::now().format("%H:%M:%S");
            let value = match reading.value {
                ReadingValue::Connectivity(_) | ReadingValue::Status(_) => {
                    output::paint_status(&reading.display_value(), color)
                }
                _ => reading.display_value(),
            };
            let label = if color {
                hub.cyan().to_string()
            } else {
                hub.to_owned()
            };
            println!("{time}  [{label}] {}: {value}", reading.name);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use netnest_core::model::ReadingKind;

    fn reading(key: &str, value: ReadingValue) -> Reading {
        Reading {
            key: key.into(),
            name: key.into(),
            kind: ReadingKind::Scalar,
            value,
            device_class: None,
            state_class: None,
            unit: None,
            icon: "mdi:network",
            attributes: None,
        }
    }

    #[test]
    fn repeated_values_print_once() {
        let mut seen = HashMap::new();
        let set = vec![reading("bandwidth", ReadingValue::Rate(100.0))];

        print_changes("home", &set, &mut seen, &OutputFormat::Plain, false);
        assert_eq!(seen.get("bandwidth"), Some(&ReadingValue::Rate(100.0)));

        // Same value again: the seen map is unchanged, nothing new recorded.
        print_changes("home", &set, &mut seen, &OutputFormat::Plain, false);
        assert_eq!(seen.len(), 1);

        let set = vec![reading("bandwidth", ReadingValue::Rate(50.0))];
        print_changes("home", &set, &mut seen, &OutputFormat::Plain, false);
        assert_eq!(seen.get("bandwidth"), Some(&ReadingValue::Rate(50.0)));
    }

    #[test]
    fn change_event_serializes_flat() {
        let r = reading("bandwidth", ReadingValue::Rate(42.0));
        let event = ChangeEvent {
            hub: "home",
            reading: &r,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["hub"], "home");
        assert_eq!(json["key"], "bandwidth");
    }
}
