// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Result Output Writers
 * Table, JSON and JSONL encoders for scan results
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use comfy_table::{presets, CellAlignment, Table};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::types::ScanResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            other => Err(anyhow::anyhow!("unknown format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

pub trait OutputWriter {
    fn write(&mut self, results: &[ScanResult]) -> Result<()>;
}

/// Human-readable table; prints "No matches found" when there is nothing
/// to report.
pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TableWriter<W> {
    fn write(&mut self, results: &[ScanResult]) -> Result<()> {
        if results.is_empty() {
            writeln!(self.writer, "No matches found")?;
            return Ok(());
        }

        let mut table = Table::new();
        table.load_preset(presets::NOTHING).set_header(vec![
            "TARGET",
            "SERVICE",
            "SPECIFICITY",
            "CATEGORY",
            "MODELS",
            "ERROR",
        ]);

        for result in results {
            table.add_row(vec![
                result.target.clone(),
                result.service.clone(),
                result.specificity.to_string(),
                result.category.clone(),
                result.models.join(", "),
                result.error.clone(),
            ]);
        }

        if let Some(column) = table.column_mut(2) {
            column.set_cell_alignment(CellAlignment::Right);
        }

        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

/// Indented JSON array; an empty result set encodes as `[]`.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write(&mut self, results: &[ScanResult]) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

/// One JSON object per line; empty result sets produce no output.
pub struct JsonlWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonlWriter<W> {
    fn write(&mut self, results: &[ScanResult]) -> Result<()> {
        for result in results {
            let line = serde_json::to_string(result)?;
            writeln!(self.writer, "{line}")?;
        }
        Ok(())
    }
}

/// Writer for the requested format over any byte sink
pub fn new_writer<W: Write + 'static>(format: OutputFormat, writer: W) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Table => Box::new(TableWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Jsonl => Box::new(JsonlWriter::new(writer)),
    }
}
