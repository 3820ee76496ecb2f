use std::collections::BTreeMap;
use std::ops::Bound;

use taxii_filter::Cursor;
use taxii_types::{StixId, Timestamp};

use crate::entry::ManifestEntry;
use crate::error::{IndexError, IndexResult};

/// Ordered manifest index over one collection's ledger.
///
/// Entries are keyed by `(date_added, id)`, the pagination order, in a
/// `BTreeMap`, so a cursor scan is a range query starting strictly after
/// the cursor position. `date_added` is strictly monotonic per collection,
/// which makes the key unique per record.
///
/// The index carries no lock of its own: the owning ledger mutates it
/// inside its per-collection write guard.
#[derive(Debug, Default)]
pub struct ManifestIndex {
    entries: BTreeMap<(Timestamp, StixId), ManifestEntry>,
}

impl ManifestIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the projection of a newly ledgered record.
    pub fn insert(&mut self, entry: ManifestEntry) -> IndexResult<()> {
        let key = (entry.date_added, entry.id.clone());
        if self.entries.contains_key(&key) {
            return Err(IndexError::DuplicateEntry {
                id: entry.id,
                date_added: entry.date_added,
            });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Remove the projection of a deleted record.
    pub fn remove(&mut self, date_added: Timestamp, id: &StixId) -> IndexResult<ManifestEntry> {
        self.entries
            .remove(&(date_added, id.clone()))
            .ok_or_else(|| IndexError::MissingEntry {
                id: id.clone(),
                date_added,
            })
    }

    /// All entries strictly after the cursor, in `(date_added, id)` order.
    ///
    /// A `None` cursor scans from the beginning.
    pub fn scan_after<'a>(
        &'a self,
        cursor: Option<&Cursor>,
    ) -> impl Iterator<Item = &'a ManifestEntry> {
        let lower = match cursor {
            Some(c) => Bound::Excluded((c.added, c.id.clone())),
            None => Bound::Unbounded,
        };
        self.entries.range((lower, Bound::Unbounded)).map(|(_, e)| e)
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxii_types::MediaType;

    fn entry(nanos: i64, id: &str) -> ManifestEntry {
        ManifestEntry {
            id: StixId::new(id).unwrap(),
            date_added: Timestamp::from_nanos(nanos),
            version: Timestamp::from_nanos(nanos),
            media_type: MediaType::stix_2_1(),
        }
    }

    #[test]
    fn scan_returns_date_added_order() {
        let mut index = ManifestIndex::new();
        index.insert(entry(3, "indicator--c")).unwrap();
        index.insert(entry(1, "indicator--a")).unwrap();
        index.insert(entry(2, "indicator--b")).unwrap();

        let ids: Vec<_> = index
            .scan_after(None)
            .map(|e| e.id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["indicator--a", "indicator--b", "indicator--c"]);
    }

    #[test]
    fn scan_after_cursor_is_strict() {
        let mut index = ManifestIndex::new();
        index.insert(entry(1, "indicator--a")).unwrap();
        index.insert(entry(2, "indicator--b")).unwrap();

        let cursor = Cursor::at(Timestamp::from_nanos(1), StixId::new("indicator--a").unwrap());
        let ids: Vec<_> = index
            .scan_after(Some(&cursor))
            .map(|e| e.id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["indicator--b"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut index = ManifestIndex::new();
        index.insert(entry(1, "indicator--a")).unwrap();
        let err = index.insert(entry(1, "indicator--a")).unwrap_err();
        assert!(matches!(err, IndexError::DuplicateEntry { .. }));
    }

    #[test]
    fn remove_drops_exactly_one_entry() {
        let mut index = ManifestIndex::new();
        index.insert(entry(1, "indicator--a")).unwrap();
        index.insert(entry(2, "indicator--a")).unwrap();

        let removed = index
            .remove(Timestamp::from_nanos(1), &StixId::new("indicator--a").unwrap())
            .unwrap();
        assert_eq!(removed.date_added, Timestamp::from_nanos(1));
        assert_eq!(index.len(), 1);

        let err = index
            .remove(Timestamp::from_nanos(1), &StixId::new("indicator--a").unwrap())
            .unwrap_err();
        assert!(matches!(err, IndexError::MissingEntry { .. }));
    }
}
