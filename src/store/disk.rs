use crate::core::cache::RateCache;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use tracing::debug;

/// Persistent rate cache backed by a fjall partition.
///
/// Read and write failures degrade to a cache miss or dropped write with a
/// debug log; historical rates carry no expiry. Values are stored as
/// decimal strings.
pub struct DiskCache {
    partition: PartitionHandle,
    // Writes are routed through the keyspace journal; hold it open.
    _keyspace: Keyspace,
}

impl DiskCache {
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let keyspace = fjall::Config::new(dir).open()?;
        let partition = keyspace.open_partition("nbp_rates", PartitionCreateOptions::default())?;
        Ok(Self {
            partition,
            _keyspace: keyspace,
        })
    }

    fn read(&self, key: &str) -> Result<Option<f64>> {
        match self.partition.get(key)? {
            Some(bytes) => Ok(std::str::from_utf8(&bytes)?.parse::<f64>().ok()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RateCache for DiskCache {
    async fn get(&self, key: &str) -> Option<f64> {
        match self.read(key) {
            Ok(Some(rate)) => {
                debug!("Cache HIT for key: {key}");
                Some(rate)
            }
            Ok(None) => {
                debug!("Cache MISS for key: {key}");
                None
            }
            Err(e) => {
                debug!("Disk cache read error for key {key}: {e}");
                None
            }
        }
    }

    async fn put(&self, key: &str, rate: f64) {
        match self.read(key) {
            Ok(Some(existing)) => {
                if existing != rate {
                    debug!("Ignoring conflicting rate write for key: {key}");
                }
            }
            Ok(None) => {
                debug!("Cache PUT for key: {key}");
                if let Err(e) = self.partition.insert(key, rate.to_string()) {
                    debug!("Disk cache write error for key {key}: {e}");
                }
            }
            Err(e) => {
                debug!("Disk cache read error for key {key}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_cache_get_put() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        assert!(cache.get("2024-01-12").await.is_none());

        cache.put("2024-01-12", 4.35).await;
        assert_eq!(cache.get("2024-01-12").await, Some(4.35));
        assert!(cache.get("2024-01-13").await.is_none());
    }

    #[tokio::test]
    async fn test_disk_cache_first_write_wins() {
        let dir = tempdir().unwrap();
        let cache = DiskCache::open(dir.path()).unwrap();

        cache.put("2024-01-12", 4.35).await;
        cache.put("2024-01-12", 9.99).await;
        assert_eq!(cache.get("2024-01-12").await, Some(4.35));
    }

    #[tokio::test]
    async fn test_disk_cache_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let cache = DiskCache::open(dir.path()).unwrap();
            cache.put("2024-01-12", 4.35).await;
        }
        let cache = DiskCache::open(dir.path()).unwrap();
        assert_eq!(cache.get("2024-01-12").await, Some(4.35));
    }
}
