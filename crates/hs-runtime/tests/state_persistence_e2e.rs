//! State persistence end-to-end tests.
//!
//! ```sh
//! cargo test -p hs-runtime --test state_persistence_e2e
//! ```
//!
//! # Invariants
//!
//! 1. **Round-trip integrity**: the last value set is the value restored.
//! 2. **Lazy default**: creating a cell never writes the default.
//! 3. **Graceful degradation**: corrupt or unwritable storage never panics.
//! 4. **Concurrent safety**: many threads can share one store.

#![cfg(test)]

use hs_runtime::persisted_state::PersistedState;
use hs_runtime::state_persistence::{MemoryStorage, StorageBackend, ValueStore};
use std::sync::{Arc, Barrier};
use std::thread;

fn log_jsonl(event: &str, case: &str, passed: bool, details: &str) {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    eprintln!(
        r#"{{"event":"{event}","case":"{case}","passed":{passed},"details":"{details}","timestamp":{timestamp}}}"#
    );
}

// ============================================================================
// 1. Save/Restore Cycle Tests
// ============================================================================

#[test]
fn persist_cycle_search_scenario() {
    let store = ValueStore::in_memory().shared();
    let mut search = PersistedState::new(store.clone(), "search", "React".to_string());
    assert_eq!(search.get(), "React");

    search.set("Go".to_string());
    assert_eq!(store.get("search").as_deref(), Some("Go"));

    log_jsonl("persist_cycle", "search_scenario", true, "default then Go");
}

#[test]
fn persist_cycle_restart_with_shared_backend() {
    let backend = Arc::new(MemoryStorage::new());

    {
        let store = ValueStore::new(Box::new(Arc::clone(&backend))).shared();
        let mut search = PersistedState::new(store, "search", "React".to_string());
        for term in ["R", "Ru", "Rus", "Rust"] {
            search.set(term.to_string());
        }
    }

    // New store over the same backend simulates the next session.
    let store = ValueStore::new(Box::new(Arc::clone(&backend))).shared();
    let search = PersistedState::new(store, "search", "React".to_string());
    assert_eq!(search.get(), "Rust");
    assert!(search.is_restored());

    log_jsonl("persist_cycle", "restart", true, "latest value restored");
}

#[test]
fn persist_cycle_default_never_written() {
    let backend = Arc::new(MemoryStorage::new());
    let store = ValueStore::new(Box::new(Arc::clone(&backend))).shared();
    let _search = PersistedState::new(store.clone(), "search", "React".to_string());

    assert_eq!(backend.get("search").unwrap(), None);
    assert_eq!(store.stats().writes, 0);

    log_jsonl("persist_cycle", "lazy_default", true, "no eager write");
}

#[test]
fn persist_cycle_independent_keys() {
    let store = ValueStore::in_memory().shared();
    let mut a = PersistedState::new(store.clone(), "search", "React".to_string());
    let mut b = PersistedState::new(store.clone(), "other", "x".to_string());

    a.set("one".to_string());
    b.set("two".to_string());

    assert_eq!(store.get("search").as_deref(), Some("one"));
    assert_eq!(store.get("other").as_deref(), Some("two"));
}

// ============================================================================
// 2. File Storage Tests
// ============================================================================

#[cfg(feature = "state-persistence")]
mod file_backed {
    use super::*;
    use hs_runtime::state_persistence::FileStorage;
    use tempfile::TempDir;

    #[test]
    fn persist_file_restart_cycle() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hacker-stories").join("state.json");

        {
            let store = ValueStore::with_file(&path).shared();
            let mut search = PersistedState::new(store, "search", "React".to_string());
            assert!(!search.is_restored());
            assert!(search.set("Redux".to_string()));
        }

        let store = ValueStore::with_file(&path).shared();
        let search = PersistedState::new(store, "search", "React".to_string());
        assert_eq!(search.get(), "Redux");

        log_jsonl("persist_file", "restart_cycle", true, "file survives restart");
    }

    #[test]
    fn persist_file_unicode_value() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        let storage = FileStorage::new(&path);
        storage.set("search", "日本語 \"quoted\"").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get("search").unwrap().as_deref(),
            Some("日本語 \"quoted\"")
        );
    }

    #[test]
    fn persist_file_truncated_file_recovers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, r#"{"format_version":1,"entries":{"sea"#).unwrap();

        let store = ValueStore::with_file(&path).shared();
        let mut search = PersistedState::new(store, "search", "React".to_string());
        assert_eq!(search.get(), "React");
        assert!(search.set("Go".to_string()));

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("search").unwrap().as_deref(), Some("Go"));

        log_jsonl("persist_file", "truncated", true, "corrupt file replaced");
    }
}

// ============================================================================
// 3. Concurrency Tests
// ============================================================================

#[test]
fn persist_concurrent_writers_last_write_wins_per_key() {
    let store = ValueStore::in_memory().shared();
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let key = format!("key-{i}");
                let mut cell = PersistedState::new(store, key, 0usize);
                for n in 1..=50 {
                    cell.set(n);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..threads {
        assert_eq!(store.get(&format!("key-{i}")).as_deref(), Some("50"));
    }
    assert_eq!(store.stats().writes, (threads * 50) as u64);
    assert_eq!(store.stats().failures, 0);

    log_jsonl("persist_concurrent", "writers", true, "all keys at 50");
}
