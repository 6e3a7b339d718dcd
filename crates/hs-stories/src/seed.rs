//! Stories and settings the app starts with.

use crate::record::Record;

/// Storage key for the last search term.
pub const SEARCH_KEY: &str = "search";

/// Search term used when nothing is stored.
pub const DEFAULT_SEARCH_TERM: &str = "React";

/// Application name; names the state directory.
pub const APP_NAME: &str = "hacker-stories";

/// The bundled story list.
pub fn initial_stories() -> Vec<Record> {
    vec![
        Record::new(0, "React")
            .with_url("https://reactjs.org/")
            .with_author("Jordan Walke")
            .with_comment_count(3)
            .with_score(4),
        Record::new(1, "Redux")
            .with_url("https://redux.js.org/")
            .with_author("Dan Abramov, Andrew Clark")
            .with_comment_count(2)
            .with_score(5),
    ]
}
