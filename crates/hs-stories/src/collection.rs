//! Ordered, immutable story collection.
//!
//! [`ItemCollection`] is a value type: [`remove`](ItemCollection::remove)
//! returns a new collection and never mutates the receiver.

use std::collections::HashSet;
use std::fmt;

use crate::record::{Record, StoryId, fold_case};

/// Construction-time validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// Two records share an id.
    DuplicateId(StoryId),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate story id {id}"),
        }
    }
}

impl std::error::Error for CollectionError {}

/// Stories in insertion order with unique ids.
///
/// `filter` and `remove` are linear scans. Collections here are small; a
/// large one would want an id → position index alongside `records`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCollection {
    records: Vec<Record>,
}

impl ItemCollection {
    /// Build a collection, rejecting duplicate ids.
    pub fn new(records: Vec<Record>) -> Result<Self, CollectionError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CollectionError::DuplicateId(record.id));
            }
        }
        Ok(Self { records })
    }

    /// Records whose title contains `term`, ignoring case, in original order.
    ///
    /// An empty term matches everything.
    pub fn filter(&self, term: &str) -> Vec<&Record> {
        let needle = fold_case(term);
        self.records
            .iter()
            .filter(|r| r.title_contains_folded(&needle))
            .collect()
    }

    /// A copy without the record `id`. An absent id yields an equal copy.
    #[must_use]
    pub fn remove(&self, id: StoryId) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.id != id)
                .cloned()
                .collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get(&self, id: StoryId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: StoryId) -> bool {
        self.get(id).is_some()
    }

    /// Ids in collection order.
    pub fn ids(&self) -> Vec<StoryId> {
        self.records.iter().map(|r| r.id).collect()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a ItemCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> ItemCollection {
        ItemCollection::new(vec![
            Record::new(0, "React"),
            Record::new(1, "Redux"),
            Record::new(2, "Rust"),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = ItemCollection::new(vec![Record::new(4, "a"), Record::new(4, "b")]).unwrap_err();
        assert_eq!(err, CollectionError::DuplicateId(StoryId(4)));
        assert_eq!(err.to_string(), "duplicate story id #4");
    }

    #[test]
    fn filter_preserves_order() {
        let c = items();
        let titles: Vec<&str> = c.filter("R").iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["React", "Redux", "Rust"]);

        let titles: Vec<&str> = c.filter("RE").iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["React", "Redux"]);
    }

    #[test]
    fn filter_matches_any_literal_substring() {
        let c = ItemCollection::new(vec![Record::new(0, "ΟΔΟΣ"), Record::new(1, "Σ and ς")])
            .unwrap();
        let ids = |term: &str| c.filter(term).iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids("Σ"), [StoryId(0), StoryId(1)]);
        assert_eq!(ids("ΟΣ"), [StoryId(0)]);
        // Final sigma stays distinct from the regular lowercase form.
        assert_eq!(ids("ς"), [StoryId(1)]);
    }

    #[test]
    fn remove_returns_new_collection() {
        let c = items();
        let removed = c.remove(StoryId(1));
        assert_eq!(removed.ids(), [StoryId(0), StoryId(2)]);
        assert_eq!(c.len(), 3);
        assert!(!removed.contains(StoryId(1)));
        assert!(removed.get(StoryId(2)).is_some());
    }

    #[test]
    fn empty_collection() {
        let c = ItemCollection::default();
        assert!(c.is_empty());
        assert!(c.filter("").is_empty());
        assert_eq!(c.remove(StoryId(0)), c);
    }

    #[test]
    fn iterates_by_reference() {
        let c = items();
        let mut n = 0;
        for record in &c {
            assert_eq!(record.id.get(), n);
            n += 1;
        }
        assert_eq!(c.iter().count(), 3);
        assert_eq!(c.as_slice().len(), 3);
    }
}
