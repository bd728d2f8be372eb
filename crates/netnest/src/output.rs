//! Output formatting: table, JSON, and plain renderings.
//!
//! Each command hands its data here with a row conversion and an
//! identifier extractor; the format selected by `--output` decides the
//! rest. Stdout carries data only; confirmations and progress go to
//! stderr so pipelines stay clean.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color handling ──────────────────────────────────────────────────

/// Whether colored output should be used for the given mode.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Paint a status label: green for online, red for offline, dimmed for
/// anything else. Pass-through when color is off.
pub fn paint_status(label: &str, color: bool) -> String {
    if !color {
        return label.to_owned();
    }
    match label {
        "online" => label.green().to_string(),
        "offline" => label.red().to_string(),
        _ => label.dimmed().to_string(),
    }
}

// ── Rendering ───────────────────────────────────────────────────────

/// Render a list of records in the requested format.
///
/// `to_row` produces the table row, `id_fn` the plain-format line.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(&data),
        OutputFormat::JsonCompact => render_json_compact(&data),
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single record in the requested format.
///
/// `detail_fn` produces the human-readable key/value lines for table
/// mode; `id_fn` the plain-format line.
pub fn render_single<T: Serialize>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String {
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print rendered output to stdout unless quiet mode suppressed it.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "(no results)".to_owned();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_json_pretty<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

pub fn render_json_compact<T: Serialize>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}
