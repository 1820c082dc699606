use serde::{de::DeserializeOwned, Serialize};

use crate::storage::KeyValueStore;

use super::{FilterState, PersistError};

/// One value mirrored to one storage slot.
///
/// `new` starts from the default and has not read storage yet; `open` also
/// hydrates, so the caller never sees the default flash before the persisted
/// value. Once hydrated (or once the caller has written a value) the
/// persisted copy can no longer replace the in-memory one.
pub struct PersistentState<T, S> {
    store: S,
    key: String,
    default: T,
    value: T,
    hydrated: bool,
    last_error: Option<PersistError>,
}

impl<T, S> PersistentState<T, S>
where
    T: Serialize + DeserializeOwned + Clone,
    S: KeyValueStore,
{
    /// Create an unhydrated state holding `default`.
    pub fn new(store: S, key: impl Into<String>, default: T) -> Self {
        PersistentState {
            store,
            key: key.into(),
            value: default.clone(),
            default,
            hydrated: false,
            last_error: None,
        }
    }

    /// Create a state and replay the persisted value, if any.
    pub fn open(store: S, key: impl Into<String>, default: T) -> Self {
        let mut state = Self::new(store, key, default);
        state.hydrate();
        state
    }

    /// Read the slot once. Returns true if a persisted value replaced the default.
    ///
    /// Missing, unreadable, or corrupt data leaves the default in place and
    /// does not touch the slot. Calls after the first are no-ops.
    pub fn hydrate(&mut self) -> bool {
        if self.hydrated {
            return false;
        }
        self.hydrated = true;

        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted state, using default");
                return false;
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to read persisted state");
                self.last_error = Some(err.into());
                return false;
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => {
                tracing::debug!(key = %self.key, "restored persisted state");
                self.value = value;
                true
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "ignoring corrupt persisted state");
                self.last_error = Some(PersistError::Serde(err.to_string()));
                false
            }
        }
    }

    /// Replace the value and persist it.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.commit();
    }

    /// Derive the next value from the current one and persist it.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next);
    }

    /// Go back to the default and persist it.
    pub fn reset(&mut self) {
        let default = self.default.clone();
        self.set(default);
    }

    /// Remove the slot entirely. The in-memory value becomes the default.
    pub fn clear_storage(&mut self) {
        self.hydrated = true;
        self.value = self.default.clone();
        match self.store.remove_item(&self.key) {
            Ok(_) => self.last_error = None,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to clear persisted state");
                self.last_error = Some(err.into());
            }
        }
    }

    fn commit(&mut self) {
        // A write wins over any later hydrate.
        self.hydrated = true;

        let raw = match serde_json::to_string(&self.value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to encode state");
                self.last_error = Some(PersistError::Serde(err.to_string()));
                return;
            }
        };

        match self.store.set_item(&self.key, &raw) {
            Ok(()) => self.last_error = None,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to persist state");
                self.last_error = Some(err.into());
            }
        }
    }
}

impl<F, S> PersistentState<F, S>
where
    F: FilterState,
    S: KeyValueStore,
{
    /// Open the slot named by a `FilterState` type, defaulting to `F::default()`.
    pub fn for_filter(store: S) -> Self {
        Self::open(store, F::STORAGE_KEY, F::default())
    }
}

impl<T, S> PersistentState<T, S> {
    /// The current in-memory value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The value `reset` goes back to.
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// The storage slot name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// True once storage has been read or the value has been written.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// The most recent storage or encoding failure, cleared by the next
    /// successful write.
    pub fn last_error(&self) -> Option<&PersistError> {
        self.last_error.as_ref()
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
