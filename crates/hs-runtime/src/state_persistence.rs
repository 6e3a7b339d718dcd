//! Key/value state persistence across sessions.
//!
//! This module provides the [`ValueStore`] and [`StorageBackend`]
//! infrastructure behind [`PersistedState`](crate::persisted_state::PersistedState).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ValueStore                             │
//! │   - Non-throwing get/set facade, shared via Arc               │
//! │   - Logs and counts backend failures                          │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     StorageBackend                            │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: JSON file (requires state-persistence)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic and never reach
//!    the UI; [`ValueStore`] logs them and carries on.
//! 2. **Atomic writes**: file storage uses the write-rename pattern.
//! 3. **Last write wins**: every `set` replaces the stored string for its key.
//! 4. **Write-through**: `set` reaches the backend before it returns.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | `get` yields `None`, `set` is dropped, both logged |
//! | `StorageError::Serialization` | Unparseable state file | File treated as empty, next write replaces it |
//! | `StorageError::Corruption` | Poisoned lock | Same as I/O |
//! | `StorageError::Unavailable` | Backend disabled | Same as I/O |
//! | Missing key | First run | `None`, caller falls back to its default |

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during state storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Storage is corrupted or a lock was poisoned.
    Corruption(String),
    /// Backend is not available.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_)
            | StorageError::Corruption(_)
            | StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

fn poisoned(what: &str) -> StorageError {
    StorageError::Corruption(format!("{what} lock poisoned"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for pluggable key/value storage backends.
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across the component tree.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read the value stored under `key`. `Ok(None)` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Returns the previous value if there was one.
    fn remove(&self, key: &str) -> StorageResult<Option<String>>;

    /// Remove every stored entry.
    fn clear(&self) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage backend for tests and ephemeral sessions.
///
/// State is lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self.data.read().map_err(|_| poisoned("memory"))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(|_| poisoned("memory"))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<Option<String>> {
        let mut guard = self.data.write().map_err(|_| poisoned("memory"))?;
        Ok(guard.remove(key))
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self.data.write().map_err(|_| poisoned("memory"))?;
        guard.clear();
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("entries", &count)
            .finish()
    }
}

/// Shared handles delegate to the shared backend.
impl<B: StorageBackend + ?Sized> StorageBackend for Arc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).remove(key)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// File format for stored state (JSON).
    #[derive(Serialize, Deserialize)]
    struct StateFile {
        /// Format version for future migrations.
        format_version: u32,
        /// Map of key -> value.
        entries: HashMap<String, String>,
    }

    impl StateFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// File-based storage backend using JSON.
    ///
    /// The file is read once on first access and mirrored in memory; every
    /// `set` rewrites the whole file before returning.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "search": "React"
    ///   }
    /// }
    /// ```
    ///
    /// # Atomic Writes
    ///
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    pub struct FileStorage {
        path: PathBuf,
        entries: RwLock<Option<HashMap<String, String>>>,
    }

    impl FileStorage {
        /// Create a file storage at the given path.
        ///
        /// The file does not need to exist; it is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
                entries: RwLock::new(None),
            }
        }

        /// Create storage at the default location for the application.
        ///
        /// Uses `$XDG_STATE_HOME/{app_name}/state.json`, falling back to
        /// `~/.local/state/{app_name}/state.json`, then the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            Self::new(state_dir().join(app_name).join("state.json"))
        }

        /// Path of the backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn read_file(&self) -> StorageResult<HashMap<String, String>> {
            if !self.path.exists() {
                // First run - no state yet
                return Ok(HashMap::new());
            }

            let reader = BufReader::new(File::open(&self.path)?);
            let state_file: StateFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse state file: {e}"))
            })?;

            if state_file.format_version != StateFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = state_file.format_version,
                    expected = StateFile::FORMAT_VERSION,
                    "state file format version mismatch, ignoring stored state"
                );
                return Ok(HashMap::new());
            }

            Ok(state_file.entries)
        }

        fn write_file(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }

            let state_file = StateFile {
                format_version: StateFile::FORMAT_VERSION,
                entries: entries.clone(),
            };

            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, &state_file).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize state: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                entries = entries.len(),
                "saved state file"
            );
            Ok(())
        }

        /// Run `f` against the in-memory mirror, loading it on first use.
        ///
        /// An unparseable file is treated as empty so the next write can
        /// replace it; I/O errors propagate.
        fn with_entries<R>(
            &self,
            f: impl FnOnce(&mut HashMap<String, String>) -> StorageResult<R>,
        ) -> StorageResult<R> {
            let mut guard = self.entries.write().map_err(|_| poisoned("file cache"))?;
            let loaded = match guard.take() {
                Some(entries) => entries,
                None => match self.read_file() {
                    Ok(entries) => entries,
                    Err(StorageError::Serialization(msg)) => {
                        tracing::warn!(
                            path = %self.path.display(),
                            error = %msg,
                            "state file unreadable, starting empty"
                        );
                        HashMap::new()
                    }
                    Err(e) => return Err(e),
                },
            };
            f(guard.insert(loaded))
        }
    }

    /// Get state directory, falling back to current dir if unavailable.
    fn state_dir() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME")
            && !state_home.is_empty()
        {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.with_entries(|entries| Ok(entries.get(key).cloned()))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.with_entries(|entries| {
                let previous = entries.insert(key.to_string(), value.to_string());
                if let Err(e) = self.write_file(entries) {
                    // Keep the mirror equal to what is on disk.
                    match previous {
                        Some(old) => entries.insert(key.to_string(), old),
                        None => entries.remove(key),
                    };
                    return Err(e);
                }
                Ok(())
            })
        }

        fn remove(&self, key: &str) -> StorageResult<Option<String>> {
            self.with_entries(|entries| {
                let Some(previous) = entries.remove(key) else {
                    return Ok(None);
                };
                if let Err(e) = self.write_file(entries) {
                    entries.insert(key.to_string(), previous);
                    return Err(e);
                }
                Ok(Some(previous))
            })
        }

        fn clear(&self) -> StorageResult<()> {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            let mut guard = self.entries.write().map_err(|_| poisoned("file cache"))?;
            *guard = Some(HashMap::new());
            Ok(())
        }

        fn is_available(&self) -> bool {
            let Some(parent) = self.path.parent() else {
                return false;
            };
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            if !parent.exists() {
                return fs::create_dir_all(parent).is_ok();
            }
            let test_path = parent.join(".hs_test_write");
            if fs::write(&test_path, b"test").is_ok() {
                let _ = fs::remove_file(&test_path);
                return true;
            }
            false
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;

// ─────────────────────────────────────────────────────────────────────────────
// Value Store
// ─────────────────────────────────────────────────────────────────────────────

/// Process-wide key/value store with best-effort semantics.
///
/// `get` and `set` never fail: backend errors are logged at `warn` and
/// counted in [`StoreStats::failures`]. Use [`try_get`](Self::try_get) and
/// [`try_set`](Self::try_set) when the caller needs to see the error.
///
/// # Example
///
/// ```
/// use hs_runtime::state_persistence::ValueStore;
///
/// let store = ValueStore::in_memory().shared();
/// assert_eq!(store.get("search"), None);
/// store.set("search", "Go");
/// assert_eq!(store.get("search").as_deref(), Some("Go"));
/// ```
pub struct ValueStore {
    backend: Box<dyn StorageBackend>,
    reads: AtomicU64,
    writes: AtomicU64,
    failures: AtomicU64,
}

impl ValueStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Create a store with memory storage (ephemeral, for testing).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Create a store with file storage at the given path.
    #[cfg(feature = "state-persistence")]
    #[must_use]
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    /// Read `key`, or `None` if it is absent or the backend failed.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    backend = %self.backend.name(),
                    key,
                    error = %e,
                    "state read failed, using default"
                );
                None
            }
        }
    }

    /// Write `value` under `key`.
    ///
    /// Returns `true` if the backend committed the write. A failed write is
    /// logged and otherwise ignored.
    pub fn set(&self, key: &str, value: &str) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    backend = %self.backend.name(),
                    key,
                    error = %e,
                    "state write failed, keeping in-memory value"
                );
                false
            }
        }
    }

    /// Read `key`, surfacing backend errors.
    pub fn try_get(&self, key: &str) -> StorageResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.backend.get(key)
    }

    /// Write `value` under `key`, surfacing backend errors.
    pub fn try_set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.backend.set(key, value)?;
        tracing::trace!(key, "state written");
        Ok(())
    }

    /// Remove a stored entry, returning its value if it existed.
    pub fn remove(&self, key: &str) -> StorageResult<Option<String>> {
        self.backend.remove(key)
    }

    /// Clear all stored state.
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.clear()
    }

    /// Get the backend name for logging.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Check if the storage backend is available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Wrap in Arc for shared ownership.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl fmt::Debug for ValueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueStore")
            .field("backend", &self.backend.name())
            .field("stats", &self.stats())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statistics and Diagnostics
// ─────────────────────────────────────────────────────────────────────────────

/// Counters describing how a [`ValueStore`] has been used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Reads issued to the backend.
    pub reads: u64,
    /// Writes issued to the backend.
    pub writes: u64,
    /// Reads or writes that failed and were swallowed.
    pub failures: u64,
    /// Backend name.
    pub backend: String,
}

impl ValueStore {
    /// Get usage statistics.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            backend: self.backend.name().to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
