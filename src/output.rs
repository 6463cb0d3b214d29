//! Output formatting for probe batches

use crate::error::{Error, Result};
use crate::result::{DetailValue, ProbeResult, Status};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL,
};
use std::io::Write;
use std::str::FromStr;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table output
    #[default]
    Human,
    /// JSON output
    Json,
    /// No output (silent mode)
    None,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "none" => Ok(Self::None),
            _ => Err(Error::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Configuration for output formatting
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Include the per-probe detail listing in human output
    pub show_details: bool,
}

impl OutputConfig {
    /// Create a new output config
    pub fn new(format: OutputFormat, show_details: bool) -> Self {
        Self {
            format,
            show_details,
        }
    }
}

/// Output a batch of probe results
pub fn output_results<W: Write>(
    results: &[ProbeResult],
    config: &OutputConfig,
    writer: &mut W,
) -> Result<()> {
    match config.format {
        OutputFormat::Human => output_human(results, config, writer),
        OutputFormat::Json => output_json(results, writer),
        OutputFormat::None => Ok(()),
    }
}

/// Output JSON format: the raw ProbeResult array
fn output_json<W: Write>(results: &[ProbeResult], writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, results)?;
    writeln!(writer).map_err(Error::OutputFailed)?;
    Ok(())
}

/// Output human-readable table format
fn output_human<W: Write>(
    results: &[ProbeResult],
    config: &OutputConfig,
    writer: &mut W,
) -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Probe").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
        ]);

    for result in results {
        table.add_row(vec![
            Cell::new(&result.name),
            status_cell(result.status),
            Cell::new(&result.description),
        ]);
    }

    writeln!(writer, "{}", table).map_err(Error::OutputFailed)?;

    if config.show_details {
        for result in results {
            if result.details.is_empty() {
                continue;
            }
            writeln!(writer, "{}:", result.name).map_err(Error::OutputFailed)?;
            for (key, value) in result.details.iter() {
                writeln!(writer, "  {}: {}", key, render_value(value))
                    .map_err(Error::OutputFailed)?;
            }
            writeln!(writer).map_err(Error::OutputFailed)?;
        }
    }

    Ok(())
}

fn status_cell(status: Status) -> Cell {
    let cell = match status {
        Status::Ok => Cell::new("Ok").fg(Color::Green),
        Status::Warning => Cell::new("Warning").fg(Color::Yellow),
        Status::Fail => Cell::new("Fail").fg(Color::Red),
        Status::Pending => Cell::new("Pending").fg(Color::DarkGrey),
    };
    cell.set_alignment(CellAlignment::Center)
}

fn render_value(value: &DetailValue) -> String {
    match value {
        DetailValue::Text(text) => text.clone(),
        DetailValue::Int(n) => n.to_string(),
        DetailValue::Bool(b) => b.to_string(),
        DetailValue::List(items) => {
            if items.is_empty() {
                "-".to_string()
            } else {
                items.join(", ")
            }
        }
    }
}
