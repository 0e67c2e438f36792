//! Rate cache abstraction shared across fetches.

use async_trait::async_trait;

/// Key-value store for historical exchange rates, keyed by ISO date.
///
/// Rates are historical facts: the first write for a key wins and a
/// conflicting write is ignored. This makes unsynchronized concurrent
/// writes for the same date safe.
#[async_trait]
pub trait RateCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<f64>;

    /// Stores a rate for `key`. A no-op if the key is already present.
    async fn put(&self, key: &str, rate: f64);
}
