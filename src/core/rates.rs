//! Rate source abstraction and cached lookup with business-day fallback.

use crate::core::cache::RateCache;
use crate::core::dates::{format_lookup_key, previous_business_day};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

/// One-shot source of a daily reference rate.
///
/// `Ok(None)` means the source published no rate for that date (weekend or
/// holiday); transport and format failures are `Err`.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn daily_rate(&self, currency: &str, date: NaiveDate) -> Result<Option<f64>>;
}

/// Resolves exchange rates through a cache, falling back to earlier
/// business days when the source has no quote for the requested date.
pub struct RateResolver<S: RateSource> {
    source: S,
    cache: Arc<dyn RateCache>,
    currency: String,
    max_fallbacks: usize,
}

impl<S: RateSource> RateResolver<S> {
    pub fn new(source: S, cache: Arc<dyn RateCache>, currency: &str, max_fallbacks: usize) -> Self {
        RateResolver {
            source,
            cache,
            currency: currency.to_string(),
            max_fallbacks: max_fallbacks.max(1),
        }
    }

    /// Returns the rate for `lookup_date`, or `None` when no quote exists
    /// within the fallback window or the source failed.
    ///
    /// The resolved rate is always cached under the originally requested
    /// date, even when a fallback date produced it, so a repeated request
    /// for the same date is a cache hit.
    pub async fn rate_for(&self, lookup_date: NaiveDate) -> Option<f64> {
        let requested = format_lookup_key(lookup_date);
        if let Some(rate) = self.cache.get(&requested).await {
            return Some(rate);
        }

        let mut current = lookup_date;
        for _ in 0..self.max_fallbacks {
            match self.source.daily_rate(&self.currency, current).await {
                Ok(Some(rate)) => {
                    self.cache.put(&requested, rate).await;
                    return Some(rate);
                }
                Ok(None) => {
                    let fallback = previous_business_day(current);
                    debug!(
                        "No rate published for {}, trying {}",
                        format_lookup_key(current),
                        format_lookup_key(fallback)
                    );
                    current = fallback;
                }
                Err(e) => {
                    warn!(error = %e, date = %format_lookup_key(current), "Rate fetch failed");
                    return None;
                }
            }
        }

        warn!(
            date = %requested,
            attempts = self.max_fallbacks,
            "No rate found within fallback window"
        );
        None
    }
}
