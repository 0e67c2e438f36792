//! CSV export of a converted statement.

use crate::core::dates::format_lookup_key;
use crate::core::statement::ConversionReport;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::debug;

const HEADERS: [&str; 10] = [
    "Date",
    "Product",
    "Description",
    "Interest Rate",
    "Money Out",
    "Money In",
    "Balance",
    "NBP Date",
    "Exchange Rate",
    "Profit PLN",
];

pub fn export_csv<P: AsRef<Path>>(report: &ConversionReport, path: P) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("Failed to create output file: {}", path.as_ref().display()))?;
    write_csv(report, file)
        .with_context(|| format!("Failed to write output file: {}", path.as_ref().display()))?;
    debug!("Exported {} rows to {}", report.rows.len(), path.as_ref().display());
    Ok(())
}

pub fn write_csv<W: Write>(report: &ConversionReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for entry in &report.rows {
        let (nbp_date, rate, profit) = match entry.conversion {
            Some(c) => (
                format_lookup_key(c.lookup_date),
                format!("{:.4}", c.rate),
                format!("{:.2}", c.profit),
            ),
            None => (String::new(), String::new(), String::new()),
        };
        csv_writer.write_record([
            entry.row.completed_date.as_str(),
            entry.row.product.as_str(),
            entry.row.description.as_str(),
            entry.row.interest_rate.as_str(),
            entry.row.money_out.as_str(),
            entry.row.money_in.as_str(),
            entry.row.balance.as_str(),
            nbp_date.as_str(),
            rate.as_str(),
            profit.as_str(),
        ])?;
    }

    // Aggregate total as the final row, label in the Exchange Rate column.
    let total = format!("{:.2}", report.total_profit);
    csv_writer.write_record([
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "Total Profit:",
        total.as_str(),
    ])?;
    csv_writer.flush()?;
    Ok(())
}
