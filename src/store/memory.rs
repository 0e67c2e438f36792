use crate::core::cache::RateCache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate cache. Lives for the process lifetime, used directly in
/// tests and as the fallback when the disk cache cannot be opened.
pub struct MemoryCache {
    inner: Arc<Mutex<HashMap<String, f64>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<f64> {
        let cache = self.inner.lock().await;
        let value = cache.get(key).copied();
        if value.is_some() {
            debug!("Cache HIT for key: {key}");
        } else {
            debug!("Cache MISS for key: {key}");
        }
        value
    }

    async fn put(&self, key: &str, rate: f64) {
        let mut cache = self.inner.lock().await;
        if let Some(existing) = cache.get(key) {
            if *existing != rate {
                debug!("Ignoring conflicting rate write for key: {key}");
            }
            return;
        }
        debug!("Cache PUT for key: {key}");
        cache.insert(key.to_string(), rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_get_put() {
        let cache = MemoryCache::new();

        // Initially, cache is empty
        assert!(cache.get("2024-01-12").await.is_none());

        cache.put("2024-01-12", 4.35).await;
        assert_eq!(cache.get("2024-01-12").await, Some(4.35));

        // Get a non-existent key
        assert!(cache.get("2024-01-13").await.is_none());
    }

    #[tokio::test]
    async fn test_first_write_wins() {
        let cache = MemoryCache::new();

        cache.put("2024-01-12", 4.35).await;
        cache.put("2024-01-12", 9.99).await;
        assert_eq!(cache.get("2024-01-12").await, Some(4.35));
    }
}
