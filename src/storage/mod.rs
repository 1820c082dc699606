//! Storage - Durable key/value slots for persisted UI state.
//!
//! A `KeyValueStore` is the smallest surface the persistence layer needs from
//! the host: read a named slot, write it, remove it. Browser origin storage
//! is one implementation (`web` feature); `InMemoryStorage` is the other and
//! can simulate quota limits and disabled storage.
//!
//! ## Example
//!
//! ```ignore
//! use folio_state::{InMemoryStorage, KeyValueStore};
//!
//! let storage = InMemoryStorage::new();
//! storage.set_item("projects-filters", r#"{"page":2}"#)?;
//! assert_eq!(storage.get_item("projects-filters")?.as_deref(), Some(r#"{"page":2}"#));
//! ```

mod in_memory;
mod store;
#[cfg(feature = "web")]
mod web;

use std::fmt;

/// Error type for key/value storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Writing the slot would exceed the storage quota. `limit` is `None`
    /// when the backend does not report it.
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: Option<usize>,
    },
    /// Storage is disabled or not reachable in this environment.
    Unavailable(String),
    /// The underlying lock was poisoned.
    LockPoisoned(&'static str),
    /// Any other backend error.
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QuotaExceeded {
                key,
                needed,
                limit: Some(limit),
            } => write!(
                f,
                "storage quota exceeded writing {} ({} bytes needed, limit {})",
                key, needed, limit
            ),
            StorageError::QuotaExceeded { key, needed, .. } => write!(
                f,
                "storage quota exceeded writing {} ({} bytes needed)",
                key, needed
            ),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Other(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

pub use in_memory::InMemoryStorage;
pub use store::KeyValueStore;
#[cfg(feature = "web")]
pub use web::LocalStorage;
