use serde_json::Value;
use taxii_filter::{Filter, Page, PageLimits};
use taxii_index::ManifestEntry;
use taxii_types::{CollectionId, StixId, Timestamp};

use crate::error::LedgerResult;
use crate::record::StixObjectRecord;

/// Write boundary for object ledger mutations.
///
/// Implementations must apply each call all-or-nothing: a failed put or
/// delete leaves the ledger and its manifest index unchanged, and the two
/// always change together.
pub trait LedgerWriter: Send + Sync {
    /// Append one object payload to a collection.
    ///
    /// Assigns a collection-monotonic `date_added`, derives the version
    /// from the payload (`modified`, else `created`, else server-assigned),
    /// and ledgers the record. A put of an already-stored `(id, version)`
    /// pair is a no-op returning the existing record.
    fn put_object(
        &self,
        collection: CollectionId,
        payload: Value,
    ) -> LedgerResult<StixObjectRecord>;

    /// Remove exactly one version of an object.
    ///
    /// Deleting the last remaining version removes the object from all
    /// subsequent listing and manifest results.
    fn delete_object_version(
        &self,
        collection: CollectionId,
        id: &StixId,
        version: Timestamp,
    ) -> LedgerResult<StixObjectRecord>;
}

/// Read boundary for object ledger queries.
///
/// Reads may run concurrently with each other and with writers; each call
/// observes a consistent snapshot no earlier than the cursor it was given.
pub trait LedgerReader: Send + Sync {
    /// All versions of an object matching the filter, ordered by version
    /// ascending. Without version selectors, every version is returned.
    fn get_object(
        &self,
        collection: CollectionId,
        id: &StixId,
        filter: &Filter,
    ) -> LedgerResult<Vec<StixObjectRecord>>;

    /// Version stamps of an object, ascending.
    fn object_versions(
        &self,
        collection: CollectionId,
        id: &StixId,
    ) -> LedgerResult<Vec<Timestamp>>;

    /// One page of objects matching the filter, in `(date_added, id)`
    /// order. Latest matching version per object unless the filter's
    /// version selectors say otherwise.
    fn list_objects(
        &self,
        collection: CollectionId,
        filter: &Filter,
        limits: &PageLimits,
    ) -> LedgerResult<Page<StixObjectRecord>>;

    /// One page of manifest entries under the same predicate/cursor
    /// contract as [`LedgerReader::list_objects`], served from the index
    /// without touching payloads.
    fn list_manifest(
        &self,
        collection: CollectionId,
        filter: &Filter,
        limits: &PageLimits,
    ) -> LedgerResult<Page<ManifestEntry>>;
}
