#![forbid(unsafe_code)]

//! Hacker Stories runtime.
//!
//! # Key Components
//!
//! - [`ValueStore`] - best-effort key/value store over a [`StorageBackend`]
//! - [`PersistedState`] - state cell seeded from and written through to the store
//! - [`Program`] - Elm-style runtime for terminal applications
//! - [`Model`] - Trait for application state and behavior
//! - [`Cmd`] - Commands for side effects
//! - [`ProgramSimulator`] - headless driver for tests

pub mod persisted_state;
pub mod program;
pub mod simulator;
pub mod state_persistence;

pub use persisted_state::{PersistValue, PersistedState};
pub use program::{Cmd, Model, Program, ProgramConfig};
pub use simulator::ProgramSimulator;
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{
    MemoryStorage, StorageBackend, StorageError, StorageResult, StoreStats, ValueStore,
};
