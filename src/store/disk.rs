use crate::core::cache::KeyValueCollection;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<SystemTime>,
}

/// Persistent collection stored in a fjall partition
pub struct DiskCollection {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Keyspace, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.partition.get(key)? else {
            debug!("Cache MISS for key: {:?}", String::from_utf8_lossy(key));
            return Ok(None);
        };

        let entry: CacheEntry =
            serde_json::from_slice(&raw).context("Failed to decode stored entry")?;
        if let Some(expires_at) = entry.expires_at
            && SystemTime::now() > expires_at
        {
            debug!("Cache entry expired for key: {:?}", String::from_utf8_lossy(key));
            self.partition.remove(key)?;
            return Ok(None);
        }

        debug!("Cache HIT for key: {:?}", String::from_utf8_lossy(key));
        Ok(Some(entry.value))
    }

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry {
            value: value.to_vec(),
            expires_at: ttl.map(|d| SystemTime::now() + d),
        };
        self.partition.insert(key, serde_json::to_vec(&entry)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Cache PUT for key: {:?}", String::from_utf8_lossy(key));
        Ok(())
    }

    async fn remove(&self, key: &[u8]) -> Result<()> {
        self.partition.remove(key)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Cache REMOVE for key: {:?}", String::from_utf8_lossy(key));
        Ok(())
    }
}
