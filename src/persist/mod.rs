//! Persist - Filter state mirrored to a durable key/value slot.
//!
//! A `PersistentState` holds one serializable value in memory and writes it,
//! as JSON, to a single named slot of a `KeyValueStore` every time it
//! changes. A fresh instance over the same slot replays the last committed
//! value.
//!
//! ## Example
//!
//! ```ignore
//! use folio_state::{FilterState, InMemoryStorage, PersistentState};
//!
//! #[derive(Serialize, Deserialize, Clone, Default, FilterState)]
//! #[filter(key = "projects-filters")]
//! struct ProjectFilters {
//!     search: String,
//!     sort_by: String,
//!     page: u32,
//! }
//!
//! let mut filters: PersistentState<ProjectFilters, _> =
//!     PersistentState::for_filter(InMemoryStorage::new());
//! filters.update(|prev| ProjectFilters { page: prev.page + 1, ..prev.clone() });
//! ```

mod state;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use crate::storage::StorageError;

/// Trait for filter records that know their own storage slot.
///
/// Usually derived: `#[derive(FilterState)]` with an optional
/// `#[filter(key = "...")]`; the key defaults to the snake_case type name.
pub trait FilterState: Serialize + DeserializeOwned + Clone + Default {
    /// The storage slot this filter record is persisted under.
    const STORAGE_KEY: &'static str;
}

/// Error recorded by a `PersistentState` when storage misbehaves.
///
/// These never escape `set`/`update`/`reset`; they are kept on the state and
/// exposed through `last_error()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The backing store refused the read or write.
    Storage(StorageError),
    /// The value could not be encoded, or the persisted slot could not be decoded.
    Serde(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Storage(err) => write!(f, "persisted state storage error: {}", err),
            PersistError::Serde(msg) => write!(f, "persisted state serialization error: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<StorageError> for PersistError {
    fn from(err: StorageError) -> Self {
        PersistError::Storage(err)
    }
}

pub use state::PersistentState;
