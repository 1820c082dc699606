//! LocalStorage - Browser origin storage via `web-sys`.

use wasm_bindgen::{JsCast, JsValue};

use super::{KeyValueStore, StorageError};

/// DOMException names browsers use when a write would exceed the quota.
const QUOTA_ERROR_NAMES: [&str; 2] = ["QuotaExceededError", "NS_ERROR_DOM_QUOTA_REACHED"];

/// `window.localStorage` for the current origin.
///
/// The handle is looked up on every call so the type stays `Send + Sync`;
/// browser storage objects themselves are not.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        LocalStorage
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| set_item_error(key, value, &e))
    }

    fn remove_item(&self, key: &str) -> Result<bool, StorageError> {
        let storage = Self::storage()?;
        let existed = storage
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("{:?}", e)))?
            .is_some();
        storage
            .remove_item(key)
            .map_err(|e| StorageError::Other(format!("{:?}", e)))?;
        Ok(existed)
    }
}

fn set_item_error(key: &str, value: &str, error: &JsValue) -> StorageError {
    match error.dyn_ref::<web_sys::DomException>() {
        Some(exception) => {
            classify_set_failure(key, value, &exception.name(), &exception.message())
        }
        None => StorageError::Other(format!("{:?}", error)),
    }
}

/// Only quota failures become `QuotaExceeded`; browsers do not report the
/// limit. Everything else (SecurityError in private mode, ...) means the
/// store cannot be written at all.
fn classify_set_failure(key: &str, value: &str, name: &str, message: &str) -> StorageError {
    if QUOTA_ERROR_NAMES.contains(&name) {
        StorageError::QuotaExceeded {
            key: key.to_string(),
            needed: key.len() + value.len(),
            limit: None,
        }
    } else {
        StorageError::Unavailable(format!("{}: {}", name, message))
    }
}
