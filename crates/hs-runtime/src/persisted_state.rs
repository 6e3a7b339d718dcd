//! A state cell backed by the key/value store.
//!
//! [`PersistedState`] seeds itself from a [`ValueStore`] on creation and
//! writes every update back before `set` returns:
//!
//! ```
//! use hs_runtime::persisted_state::PersistedState;
//! use hs_runtime::state_persistence::ValueStore;
//!
//! let store = ValueStore::in_memory().shared();
//! let mut search = PersistedState::new(store.clone(), "search", String::from("React"));
//! assert_eq!(search.get(), "React");
//! assert_eq!(store.get("search"), None); // the default is not written back
//!
//! search.set("Go".to_string());
//! assert_eq!(store.get("search").as_deref(), Some("Go"));
//! ```
//!
//! Persistence is best-effort. If the store cannot be written the in-memory
//! value is still updated and stays authoritative for the session.

use std::fmt;
use std::sync::Arc;

use crate::state_persistence::ValueStore;

/// String codec for values held in a [`PersistedState`].
pub trait PersistValue: Sized {
    /// Encode for storage.
    fn encode(&self) -> String;

    /// Decode a stored string. `None` means the stored value is unusable.
    fn decode(raw: &str) -> Option<Self>;
}

impl PersistValue for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

macro_rules! persist_via_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PersistValue for $ty {
                fn encode(&self) -> String {
                    self.to_string()
                }

                fn decode(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

persist_via_from_str!(bool, i32, i64, u16, u32, u64, usize);

/// A value seeded from, and written through to, a [`ValueStore`].
pub struct PersistedState<T> {
    store: Arc<ValueStore>,
    key: String,
    value: T,
    restored: bool,
}

impl<T: PersistValue> PersistedState<T> {
    /// Create the cell, seeding it from `store[key]` or `initial`.
    ///
    /// `initial` is not written to the store; the first [`set`](Self::set)
    /// is the first write.
    pub fn new(store: Arc<ValueStore>, key: impl Into<String>, initial: T) -> Self {
        let key = key.into();
        let (value, restored) = match store.get(&key) {
            Some(raw) => match T::decode(&raw) {
                Some(value) => (value, true),
                None => {
                    tracing::warn!(key = %key, raw = %raw, "stored value not decodable, using default");
                    (initial, false)
                }
            },
            None => (initial, false),
        };
        tracing::debug!(key = %key, restored, "persisted state created");
        Self {
            store,
            key,
            value,
            restored,
        }
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value, then write it through to the store.
    ///
    /// Every call writes, including one that sets an equal value. Returns
    /// `true` if the store committed the write.
    pub fn set(&mut self, value: T) -> bool {
        self.value = value;
        self.store.set(&self.key, &self.value.encode())
    }

    /// Storage key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the initial value came from the store.
    #[inline]
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// The store this cell writes to.
    #[inline]
    pub fn store(&self) -> &Arc<ValueStore> {
        &self.store
    }

    /// Consume the cell, returning the current value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistedState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedState")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("restored", &self.restored)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_persistence::{MemoryStorage, StorageBackend, StorageError, StorageResult};
    use std::sync::Mutex;

    /// Backend that records every write in order.
    #[derive(Default)]
    struct RecordingStorage {
        inner: MemoryStorage,
        log: Mutex<Vec<(String, String)>>,
    }

    impl StorageBackend for RecordingStorage {
        fn name(&self) -> &str {
            "RecordingStorage"
        }
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.log
                .lock()
                .unwrap()
                .push((key.to_string(), value.to_string()));
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.remove(key)
        }
        fn clear(&self) -> StorageResult<()> {
            self.inner.clear()
        }
    }

    struct ReadOnlyStorage(MemoryStorage);

    impl StorageBackend for ReadOnlyStorage {
        fn name(&self) -> &str {
            "ReadOnlyStorage"
        }
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("read-only".into()))
        }
        fn remove(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("read-only".into()))
        }
        fn clear(&self) -> StorageResult<()> {
            Err(StorageError::Unavailable("read-only".into()))
        }
    }

    #[test]
    fn empty_store_uses_initial_without_writing() {
        let store = ValueStore::in_memory().shared();
        let state = PersistedState::new(store.clone(), "search", "React".to_string());
        assert_eq!(state.get(), "React");
        assert!(!state.is_restored());
        assert_eq!(store.get("search"), None);
        assert_eq!(store.stats().writes, 0);
    }

    #[test]
    fn set_writes_through() {
        let store = ValueStore::in_memory().shared();
        let mut state = PersistedState::new(store.clone(), "search", "React".to_string());
        assert!(state.set("Go".to_string()));
        assert_eq!(state.get(), "Go");
        assert_eq!(store.get("search").as_deref(), Some("Go"));
    }

    #[test]
    fn recreating_restores_last_value() {
        let store = ValueStore::in_memory().shared();
        {
            let mut state = PersistedState::new(store.clone(), "search", "React".to_string());
            state.set("Redux".to_string());
        }
        let state = PersistedState::new(store, "search", "React".to_string());
        assert_eq!(state.get(), "Redux");
        assert!(state.is_restored());
    }

    #[test]
    fn stored_empty_string_is_a_value() {
        let store = ValueStore::in_memory().shared();
        store.set("search", "");
        let state = PersistedState::new(store, "search", "React".to_string());
        assert_eq!(state.get(), "");
        assert!(state.is_restored());
    }

    #[test]
    fn writes_follow_setter_order() {
        let backend = Arc::new(RecordingStorage::default());
        let store = ValueStore::new(Box::new(Arc::clone(&backend))).shared();
        let mut state = PersistedState::new(store, "search", String::new());

        for term in ["R", "Re", "Re", "Red"] {
            state.set(term.to_string());
        }

        let log = backend.log.lock().unwrap();
        let values: Vec<&str> = log.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, ["R", "Re", "Re", "Red"]);
        assert!(log.iter().all(|(k, _)| k == "search"));
    }

    #[test]
    fn failed_write_keeps_memory_value() {
        let backend = ReadOnlyStorage(MemoryStorage::with_entries([("search", "React")]));
        let store = ValueStore::new(Box::new(backend)).shared();
        let mut state = PersistedState::new(store.clone(), "search", "x".to_string());
        assert_eq!(state.get(), "React");

        assert!(!state.set("Go".to_string()));
        assert_eq!(state.get(), "Go");
        assert_eq!(store.get("search").as_deref(), Some("React"));
        assert_eq!(store.stats().failures, 1);
    }

    #[test]
    fn undecodable_value_falls_back() {
        let store = ValueStore::new(Box::new(MemoryStorage::with_entries([(
            "count", "lots",
        )])))
        .shared();
        let state = PersistedState::new(store, "count", 7u32);
        assert_eq!(*state.get(), 7);
        assert!(!state.is_restored());
    }

    #[test]
    fn non_string_values_round_trip() {
        let store = ValueStore::in_memory().shared();
        let mut flag = PersistedState::new(store.clone(), "focus", false);
        flag.set(true);
        assert_eq!(store.get("focus").as_deref(), Some("true"));

        let restored = PersistedState::new(store, "focus", false);
        assert!(*restored.get());
        assert!(restored.into_inner());
    }
}
