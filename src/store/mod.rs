pub mod disk;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::warn;

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<(String, bool), Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Keyspace>,
}

impl KeyValueStore {
    /// Opens the on-disk keyspace under `data_path`. The store still works
    /// without it, but only hands out in-memory collections.
    pub fn open(data_path: &Path) -> Self {
        let keyspace = match fjall::Config::new(data_path.join("store")).open() {
            Ok(keyspace) => Some(keyspace),
            Err(e) => {
                warn!(
                    error = %e,
                    path = %data_path.display(),
                    "Failed to open persistent store"
                );
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.keyspace.is_some()
    }

    fn open_disk_collection(&self, name: &str) -> Option<Arc<dyn KeyValueCollection>> {
        let keyspace = self.keyspace.as_ref()?;
        match keyspace.open_partition(name, PartitionCreateOptions::default()) {
            Ok(partition) => Some(
                Arc::new(DiskCollection::new(keyspace.clone(), partition))
                    as Arc<dyn KeyValueCollection>,
            ),
            Err(e) => {
                warn!(error = %e, collection = name, "Failed to open partition");
                None
            }
        }
    }
}

impl Store for KeyValueStore {
    fn get_collection(&self, name: &str, persist: bool) -> Option<Arc<dyn KeyValueCollection>> {
        let key = (name.to_string(), persist);
        if let Some(collection) = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Some(Arc::clone(collection));
        }

        let collection = if persist {
            self.open_disk_collection(name)?
        } else {
            Arc::new(MemoryCollection::new()) as Arc<dyn KeyValueCollection>
        };

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Some(Arc::clone(collections.entry(key).or_insert(collection)))
    }
}
