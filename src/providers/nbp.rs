//! NBP (Narodowy Bank Polski) daily reference rate source.

use crate::core::dates::format_lookup_key;
use crate::core::rates::RateSource;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Fetches table-A mid rates from the NBP web API.
pub struct NbpProvider {
    base_url: String,
}

impl NbpProvider {
    pub fn new(base_url: &str) -> Self {
        NbpProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NbpResponse {
    rates: Vec<NbpQuote>,
}

#[derive(Debug, Deserialize)]
struct NbpQuote {
    mid: f64,
    #[serde(alias = "effectiveDate")]
    effective_date: String,
}

#[async_trait]
impl RateSource for NbpProvider {
    #[instrument(
        name = "NbpRateFetch",
        skip(self),
        fields(currency = %currency, date = %date)
    )]
    async fn daily_rate(&self, currency: &str, date: NaiveDate) -> Result<Option<f64>> {
        let url = format!(
            "{}/api/exchangerates/rates/a/{}/{}/?format=json",
            self.base_url,
            currency,
            format_lookup_key(date)
        );
        debug!("Requesting exchange rate from {}", url);

        let client = reqwest::Client::builder().user_agent("eur2pln/1.0").build()?;
        let response = client.get(&url).send().await.map_err(|e| {
            anyhow!("Request error: {} for currency: {} URL: {}", e, currency, url)
        })?;

        // NBP answers 404 for dates without a published table
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for currency: {} on {}",
                response.status(),
                currency,
                format_lookup_key(date)
            ));
        }

        let text = response.text().await?;
        let data: NbpResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse NBP response for {}: {}", currency, e))?;

        let quote = data.rates.into_iter().next().ok_or_else(|| {
            anyhow!(
                "No rate data in NBP response for {} on {}",
                currency,
                format_lookup_key(date)
            )
        })?;

        debug!(
            "Received {} mid rate {} effective {}",
            currency, quote.mid, quote.effective_date
        );
        Ok(Some(quote.mid))
    }
}
