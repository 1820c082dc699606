//! KeyValueStore - Abstract durable string slots.

use std::sync::Arc;

use super::StorageError;

/// Durable string storage scoped to one origin (or one process, in memory).
///
/// Every method takes `&self`; implementations use interior mutability so a
/// store can be shared between several `PersistentState` instances.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. Returns None if nothing is stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a slot, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Returns true if it existed.
    fn remove_item(&self, key: &str) -> Result<bool, StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove_item(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove_item(key)
    }
}
