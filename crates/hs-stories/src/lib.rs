#![forbid(unsafe_code)]

//! Hacker Stories: a searchable, dismissible story list that remembers the
//! last search across sessions.
//!
//! - [`ItemCollection`] - ordered stories with `filter` and `remove`
//! - [`StoriesApp`] - the [`Model`](hs_runtime::Model) wiring search,
//!   dismissal and focus together
//! - [`cli`] - argument and environment parsing for the binary

pub mod app;
pub mod cli;
pub mod collection;
pub mod error;
pub mod record;
pub mod seed;

pub use app::{AppConfig, Msg, StoriesApp};
pub use collection::{CollectionError, ItemCollection};
pub use error::{Error, Result};
pub use record::{Record, StoryId, fold_case};
