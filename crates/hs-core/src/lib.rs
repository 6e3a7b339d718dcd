#![forbid(unsafe_code)]

//! Core: terminal lifecycle, input events, and geometry.

pub mod event;
pub mod geometry;
pub mod logging;
pub mod terminal_session;

// Keep `hs_core::debug!` and friends resolvable with the feature on or off.
#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};
