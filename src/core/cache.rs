use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A named byte key-value namespace. Entries may carry a TTL after which they read as absent.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> Result<()>;
    async fn remove(&self, key: &[u8]) -> Result<()>;
}

pub trait Store {
    /// Returns the named collection, creating it on first use. `None` when a
    /// persistent collection is requested but the backing store is unavailable.
    fn get_collection(&self, name: &str, persist: bool) -> Option<Arc<dyn KeyValueCollection>>;
}
