//! Story records.

use std::fmt;

/// Unique identifier of a story within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StoryId(pub u64);

impl StoryId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for StoryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: StoryId,
    pub title: String,
    pub url: String,
    pub author: String,
    pub comment_count: u32,
    pub score: i64,
}

impl Record {
    /// Create a record with empty metadata.
    pub fn new(id: impl Into<StoryId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: String::new(),
            author: String::new(),
            comment_count: 0,
            score: 0,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn with_comment_count(mut self, count: u32) -> Self {
        self.comment_count = count;
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    /// Case-insensitive title match against a needle already passed
    /// through [`fold_case`].
    pub(crate) fn title_contains_folded(&self, needle: &str) -> bool {
        needle.is_empty() || fold_case(&self.title).contains(needle)
    }
}

/// Lowercase `text` one character at a time.
///
/// Unlike `str::to_lowercase`, no character's mapping depends on its
/// neighbours (a word-final `Σ` still folds to `σ`), so folding a substring
/// always yields a substring of the folded whole.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let r = Record::new(7, "Rust")
            .with_url("https://www.rust-lang.org")
            .with_author("Graydon Hoare")
            .with_comment_count(12)
            .with_score(-3);
        assert_eq!(r.id, StoryId(7));
        assert_eq!(r.author, "Graydon Hoare");
        assert_eq!(r.comment_count, 12);
        assert_eq!(r.score, -3);
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let r = Record::new(1, "Redux");
        assert!(r.title_contains_folded("red"));
        assert!(r.title_contains_folded("dux"));
        assert!(r.title_contains_folded(""));
        assert!(!r.title_contains_folded("react"));
    }

    #[test]
    fn unicode_case_folding() {
        let r = Record::new(2, "ÉCOLE Straße");
        assert!(r.title_contains_folded(&fold_case("école")));
        assert!(!r.title_contains_folded(&fold_case("STRASSE")));
        assert!(r.title_contains_folded(&fold_case("STRAßE")));
    }

    #[test]
    fn final_sigma_folds_without_context() {
        assert_eq!(fold_case("ΟΔΟΣ"), "οδοσ");
        assert_eq!(fold_case("Σ"), "σ");
        let r = Record::new(3, "ΟΔΟΣ");
        assert!(r.title_contains_folded(&fold_case("Σ")));
        assert!(r.title_contains_folded(&fold_case("ΟΣ")));
        assert!(r.title_contains_folded(&fold_case("οδος")));
    }

    #[test]
    fn id_display() {
        assert_eq!(StoryId(42).to_string(), "#42");
        assert_eq!(StoryId::from(3).get(), 3);
    }
}
