//! Statement conversion pipeline: per-row enrichment and batched fetching.

use crate::core::dates::{compare_statement_dates, parse_statement_date, previous_business_day};
use crate::core::rates::{RateResolver, RateSource};
use crate::core::statement::{
    Conversion, ConversionReport, EnrichedRow, StatementRow, parse_money,
};
use futures::future::join_all;
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::{debug, warn};

/// Batching knobs for the NBP request budget.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Rows fetched concurrently per group.
    pub chunk_size: usize,
    /// Pause between groups.
    pub chunk_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            chunk_size: 50,
            chunk_delay: Duration::from_millis(100),
        }
    }
}

/// Attaches a PLN conversion to an interest row.
///
/// Non-interest rows, rows without a money-in amount, and rows for which no
/// rate can be resolved pass through unchanged. A malformed money-in amount
/// contributes zero profit instead of failing the batch.
pub async fn enrich_row<S: RateSource>(
    row: StatementRow,
    resolver: &RateResolver<S>,
) -> EnrichedRow {
    if !row.is_interest() || row.money_in.trim().is_empty() {
        return EnrichedRow::unenriched(row);
    }

    let completed = match parse_statement_date(&row.completed_date) {
        Ok(date) => date,
        Err(e) => {
            warn!(error = %e, "Skipping interest row with malformed date");
            return EnrichedRow::unenriched(row);
        }
    };

    let lookup_date = previous_business_day(completed);
    match resolver.rate_for(lookup_date).await {
        Some(rate) => {
            let amount = parse_money(&row.money_in).unwrap_or_else(|| {
                warn!(amount = %row.money_in, "Malformed money-in amount, counting zero profit");
                0.0
            });
            EnrichedRow {
                row,
                conversion: Some(Conversion {
                    lookup_date,
                    rate,
                    profit: amount * rate,
                }),
            }
        }
        None => {
            debug!(date = %row.completed_date, "No rate resolved, leaving row unenriched");
            EnrichedRow::unenriched(row)
        }
    }
}

/// Converts a full statement.
///
/// Interest rows are fetched in fixed-size groups with a pause between
/// groups; within a group all lookups run concurrently. The result merges
/// enriched and untouched rows, sorted chronologically (stable for equal
/// dates), with the summed PLN profit.
pub async fn convert_statement<S: RateSource>(
    rows: Vec<StatementRow>,
    resolver: &RateResolver<S>,
    options: &BatchOptions,
    progress: &ProgressBar,
) -> ConversionReport {
    let (interest, other): (Vec<_>, Vec<_>) = rows.into_iter().partition(StatementRow::is_interest);
    debug!(
        "Converting {} interest rows ({} other rows pass through)",
        interest.len(),
        other.len()
    );

    let chunk_size = options.chunk_size.max(1);
    let mut enriched: Vec<EnrichedRow> = Vec::with_capacity(interest.len() + other.len());

    for (index, chunk) in interest.chunks(chunk_size).enumerate() {
        if index > 0 {
            tokio::time::sleep(options.chunk_delay).await;
        }
        let results = join_all(chunk.iter().map(|row| {
            let progress = progress.clone();
            async move {
                let result = enrich_row(row.clone(), resolver).await;
                progress.inc(1);
                result
            }
        }))
        .await;
        enriched.extend(results);
    }

    enriched.extend(other.into_iter().map(EnrichedRow::unenriched));
    enriched.sort_by(|a, b| compare_statement_dates(&a.row.completed_date, &b.row.completed_date));

    let total_profit = enriched
        .iter()
        .filter_map(|entry| entry.conversion.map(|c| c.profit))
        .sum();

    ConversionReport {
        rows: enriched,
        total_profit,
    }
}
