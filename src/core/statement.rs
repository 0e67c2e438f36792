//! Statement rows and CSV ingestion.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Description marker identifying interest income entries.
pub const INTEREST_MARKER: &str = "Gross interest";

/// A single statement row as parsed from the input CSV. Never mutated
/// after parsing; identity is positional.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatementRow {
    #[serde(rename = "Completed Date")]
    pub completed_date: String,
    #[serde(rename = "Product name")]
    pub product: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Interest rate (p.a.)")]
    pub interest_rate: String,
    #[serde(rename = "Money out")]
    pub money_out: String,
    #[serde(rename = "Money in")]
    pub money_in: String,
    #[serde(rename = "Balance")]
    pub balance: String,
}

impl StatementRow {
    pub fn is_interest(&self) -> bool {
        self.description.contains(INTEREST_MARKER)
    }
}

/// PLN conversion metadata attached to an interest row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    /// The NBP publication date the rate was requested for.
    pub lookup_date: NaiveDate,
    /// EUR/PLN mid rate.
    pub rate: f64,
    /// Money-in amount converted to PLN.
    pub profit: f64,
}

/// A statement row plus its optional conversion. `conversion` is `None`
/// for non-interest rows and for rows where no rate could be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub row: StatementRow,
    pub conversion: Option<Conversion>,
}

impl EnrichedRow {
    pub fn unenriched(row: StatementRow) -> Self {
        EnrichedRow {
            row,
            conversion: None,
        }
    }
}

/// The converted statement: chronologically sorted rows plus the summed
/// PLN profit of all enriched rows.
#[derive(Debug)]
pub struct ConversionReport {
    pub rows: Vec<EnrichedRow>,
    pub total_profit: f64,
}

/// Parses a currency-formatted amount like "€1,234.56" into a decimal value.
///
/// Strips a leading euro sign and thousands separators. Returns `None` for
/// empty or malformed input.
pub fn parse_money(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let trimmed = trimmed.strip_prefix('€').unwrap_or(trimmed);
    trimmed.replace(',', "").parse::<f64>().ok()
}

/// Reads a full statement from a CSV file. Any read or format failure is
/// fatal: without parsed rows there is nothing to convert.
pub fn read_statement<P: AsRef<Path>>(path: P) -> Result<Vec<StatementRow>> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to read statement file: {}", path.as_ref().display()))?;
    parse_statement(file)
        .with_context(|| format!("Failed to parse statement file: {}", path.as_ref().display()))
}

pub fn parse_statement<R: Read>(reader: R) -> Result<Vec<StatementRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        let row: StatementRow = record.context("Malformed statement row")?;
        rows.push(row);
    }
    debug!("Parsed {} statement rows", rows.len());
    Ok(rows)
}
