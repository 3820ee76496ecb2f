use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;
use taxii_filter::{Filter, Page, PageLimits};
use taxii_index::{IndexError, ManifestEntry, ManifestIndex};
use taxii_types::{CollectionId, StixId, Timestamp};
use tracing::debug;

use crate::clock::AddedClock;
use crate::error::{LedgerError, LedgerResult};
use crate::record::{RecordDraft, StixObjectRecord};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory object ledger for tests, local deployments, and embedding.
///
/// One entry per collection, each holding its version chains, its manifest
/// index, and its `date_added` clock. A single `RwLock` over the collection
/// map gives the required discipline: writes to a collection serialize
/// (append, index update, and clock tick happen under one write guard as an
/// atomic unit), while reads run concurrently against a consistent
/// snapshot.
pub struct InMemoryLedger {
    collections: RwLock<HashMap<CollectionId, CollectionState>>,
}

#[derive(Default)]
struct CollectionState {
    clock: AddedClock,
    /// Version chains: id → version stamp → record.
    objects: HashMap<StixId, BTreeMap<Timestamp, StixObjectRecord>>,
    manifest: ManifestIndex,
}

impl CollectionState {
    fn chain_bounds(chain: &BTreeMap<Timestamp, StixObjectRecord>) -> (Timestamp, Timestamp) {
        // Chains are never empty: the last delete removes the id entirely.
        let first = *chain.keys().next().expect("non-empty chain");
        let last = *chain.keys().next_back().expect("non-empty chain");
        (first, last)
    }
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently ledgered in a collection, across all
    /// version chains.
    pub fn record_count(&self, collection: CollectionId) -> usize {
        let state = self.collections.read().expect("ledger lock poisoned");
        state
            .get(&collection)
            .map(|c| c.manifest.len())
            .unwrap_or(0)
    }

    fn read_state(
        &self,
    ) -> LedgerResult<std::sync::RwLockReadGuard<'_, HashMap<CollectionId, CollectionState>>> {
        self.collections
            .read()
            .map_err(|_| LedgerError::Unavailable {
                reason: "ledger read lock poisoned".into(),
            })
    }

    fn write_state(
        &self,
    ) -> LedgerResult<std::sync::RwLockWriteGuard<'_, HashMap<CollectionId, CollectionState>>> {
        self.collections
            .write()
            .map_err(|_| LedgerError::Unavailable {
                reason: "ledger write lock poisoned".into(),
            })
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn put_object(
        &self,
        collection: CollectionId,
        payload: Value,
    ) -> LedgerResult<StixObjectRecord> {
        let draft = RecordDraft::from_payload(payload)?;

        let mut state = self.write_state()?;
        let coll = state.entry(collection).or_default();

        // Idempotent retry: an already-ledgered (id, version) pair is a
        // no-op returning the stored record, with no clock tick.
        if let Some(version) = draft.version {
            if let Some(existing) = coll.objects.get(&draft.id).and_then(|c| c.get(&version)) {
                debug!(collection = %collection, id = %draft.id, version = %version, "duplicate put ignored");
                return Ok(existing.clone());
            }
        }

        let date_added = coll.clock.tick();
        // Unversioned objects get the date_added stamp as their version:
        // server-assigned and consistent for the record's lifetime.
        let version = draft.version.unwrap_or(date_added);

        let media_type = draft.media_type();
        let record = StixObjectRecord {
            id: draft.id,
            version,
            spec_version: draft.spec_version,
            media_type,
            date_added,
            payload: draft.payload,
        };

        // Index first: if it rejects, the ledger is untouched.
        coll.manifest.insert(record.manifest_entry())?;
        coll.objects
            .entry(record.id.clone())
            .or_default()
            .insert(version, record.clone());

        debug!(collection = %collection, id = %record.id, version = %version, date_added = %date_added, "object ledgered");
        Ok(record)
    }

    fn delete_object_version(
        &self,
        collection: CollectionId,
        id: &StixId,
        version: Timestamp,
    ) -> LedgerResult<StixObjectRecord> {
        let mut state = self.write_state()?;
        let coll = state
            .get_mut(&collection)
            .ok_or_else(|| LedgerError::ObjectNotFound { id: id.clone() })?;
        let chain = coll
            .objects
            .get_mut(id)
            .ok_or_else(|| LedgerError::ObjectNotFound { id: id.clone() })?;
        let record = chain
            .get(&version)
            .cloned()
            .ok_or_else(|| LedgerError::VersionNotFound {
                id: id.clone(),
                version,
            })?;

        // Index first, then the chain; both under the same write guard.
        coll.manifest.remove(record.date_added, id)?;
        chain.remove(&version);
        if chain.is_empty() {
            coll.objects.remove(id);
        }

        debug!(collection = %collection, id = %id, version = %version, "object version deleted");
        Ok(record)
    }
}

impl LedgerReader for InMemoryLedger {
    fn get_object(
        &self,
        collection: CollectionId,
        id: &StixId,
        filter: &Filter,
    ) -> LedgerResult<Vec<StixObjectRecord>> {
        let state = self.read_state()?;
        let chain = state
            .get(&collection)
            .and_then(|c| c.objects.get(id))
            .ok_or_else(|| LedgerError::ObjectNotFound { id: id.clone() })?;

        let (first, last) = CollectionState::chain_bounds(chain);
        Ok(chain
            .values()
            .filter(|r| filter.matches_spec_version(&r.spec_version))
            .filter(|r| {
                // The single-object endpoint returns every version unless
                // the request names selectors; listings default to `last`.
                filter.selects_all_versions()
                    || filter.selects_version(r.version, first, last)
            })
            .cloned()
            .collect())
    }

    fn object_versions(
        &self,
        collection: CollectionId,
        id: &StixId,
    ) -> LedgerResult<Vec<Timestamp>> {
        let state = self.read_state()?;
        let chain = state
            .get(&collection)
            .and_then(|c| c.objects.get(id))
            .ok_or_else(|| LedgerError::ObjectNotFound { id: id.clone() })?;
        Ok(chain.keys().copied().collect())
    }

    fn list_objects(
        &self,
        collection: CollectionId,
        filter: &Filter,
        limits: &PageLimits,
    ) -> LedgerResult<Page<StixObjectRecord>> {
        let limit = limits.effective(filter.limit);
        let state = self.read_state()?;
        let Some(coll) = state.get(&collection) else {
            return Ok(Page::empty());
        };

        let mut matches = Vec::new();
        for entry in coll.manifest.scan_after(filter.next.as_ref()) {
            if matches.len() > limit {
                break;
            }
            if !entry_matches(filter, entry) {
                continue;
            }
            let chain = coll
                .objects
                .get(&entry.id)
                .ok_or_else(|| missing_record(entry))?;
            let record = chain.get(&entry.version).ok_or_else(|| missing_record(entry))?;
            if !filter.matches_spec_version(&record.spec_version) {
                continue;
            }
            let (first, last) = CollectionState::chain_bounds(chain);
            if !filter.selects_version(entry.version, first, last) {
                continue;
            }
            matches.push((entry.date_added, entry.id.clone(), record.clone()));
        }

        Ok(Page::assemble(matches, limit))
    }

    fn list_manifest(
        &self,
        collection: CollectionId,
        filter: &Filter,
        limits: &PageLimits,
    ) -> LedgerResult<Page<ManifestEntry>> {
        let limit = limits.effective(filter.limit);
        let state = self.read_state()?;
        let Some(coll) = state.get(&collection) else {
            return Ok(Page::empty());
        };

        let mut matches = Vec::new();
        for entry in coll.manifest.scan_after(filter.next.as_ref()) {
            if matches.len() > limit {
                break;
            }
            if !entry_matches(filter, entry) {
                continue;
            }
            // Spec version rides on the entry's media type; the payload
            // stays untouched on the manifest path.
            if !filter.matches_spec_version(entry.media_type.version_or_default()) {
                continue;
            }
            let chain = coll
                .objects
                .get(&entry.id)
                .ok_or_else(|| missing_record(entry))?;
            let (first, last) = CollectionState::chain_bounds(chain);
            if !filter.selects_version(entry.version, first, last) {
                continue;
            }
            matches.push((entry.date_added, entry.id.clone(), entry.clone()));
        }

        Ok(Page::assemble(matches, limit))
    }
}

/// Dimensions answerable from the manifest entry alone.
fn entry_matches(filter: &Filter, entry: &ManifestEntry) -> bool {
    filter.matches_added_after(entry.date_added) && filter.matches_id(&entry.id)
}

fn missing_record(entry: &ManifestEntry) -> LedgerError {
    LedgerError::Index(IndexError::MissingEntry {
        id: entry.id.clone(),
        date_added: entry.date_added,
    })
}
