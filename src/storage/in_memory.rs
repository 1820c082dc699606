//! InMemoryStorage - HashMap-backed key/value store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{KeyValueStore, StorageError};

struct Slots {
    items: HashMap<String, String>,
    quota: Option<usize>,
    enabled: bool,
}

impl Slots {
    /// Bytes used by every slot except `skip`, counting keys and values.
    fn used_without(&self, skip: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != skip)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

/// In-memory key/value store backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same slots, which is how tests
/// simulate a page reload (a fresh `PersistentState` over a clone).
#[derive(Clone)]
pub struct InMemoryStorage {
    storage: Arc<RwLock<Slots>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new empty, unlimited store.
    pub fn new() -> Self {
        Self::build(None, true)
    }

    /// Create a store that refuses writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self::build(Some(bytes), true)
    }

    /// Create a store that fails every operation, like storage disabled by
    /// browser privacy settings.
    pub fn disabled() -> Self {
        Self::build(None, false)
    }

    fn build(quota: Option<usize>, enabled: bool) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Slots {
                items: HashMap::new(),
                quota,
                enabled,
            })),
        }
    }

    /// Turn the store on or off. Existing slots are kept.
    pub fn set_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StorageError::LockPoisoned("storage toggle"))?;
        storage.enabled = enabled;
        Ok(())
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("storage read"))?;
        if !storage.enabled {
            return Err(StorageError::Unavailable("storage is disabled".into()));
        }
        Ok(storage.items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StorageError::LockPoisoned("storage write"))?;
        if !storage.enabled {
            return Err(StorageError::Unavailable("storage is disabled".into()));
        }

        if let Some(limit) = storage.quota {
            let needed = storage.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit: Some(limit),
                });
            }
        }

        storage.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StorageError::LockPoisoned("storage write"))?;
        if !storage.enabled {
            return Err(StorageError::Unavailable("storage is disabled".into()));
        }
        Ok(storage.items.remove(key).is_some())
    }
}
