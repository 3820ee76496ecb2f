use std::sync::Arc;

use serde_json::Value;
use taxii_filter::{Filter, Page, PageLimits};
use taxii_index::ManifestEntry;
use taxii_ledger::{InMemoryLedger, LedgerReader, LedgerWriter, StixObjectRecord};
use taxii_registry::{Collection, CollectionRegistry};
use taxii_status::{StatusResource, StatusTracker};
use taxii_types::{CollectionId, StatusId, StixId, Timestamp};

use crate::error::CoreResult;
use crate::ingest::{run_ingest, BatchItem};

/// The store as the embedding layer sees it.
///
/// Owns one collection registry, one object ledger (with its manifest
/// index), and one status tracker, and exposes the synchronous call
/// surface the transport layer binds to. The only asynchronous seam is
/// [`TaxiiStore::add_objects`], which accepts a batch immediately and
/// ingests it on a spawned worker.
pub struct TaxiiStore {
    registry: CollectionRegistry,
    ledger: Arc<InMemoryLedger>,
    statuses: Arc<StatusTracker>,
    limits: PageLimits,
}

impl TaxiiStore {
    /// A store with default page limits.
    pub fn new() -> Self {
        Self::with_limits(PageLimits::default())
    }

    /// A store with explicit page limits.
    pub fn with_limits(limits: PageLimits) -> Self {
        Self {
            registry: CollectionRegistry::new(),
            ledger: Arc::new(InMemoryLedger::new()),
            statuses: Arc::new(StatusTracker::new()),
            limits,
        }
    }

    /// The configured page limits.
    pub fn limits(&self) -> &PageLimits {
        &self.limits
    }

    // ---- Collection registry ----

    /// Register a collection (administrative configuration).
    pub fn register_collection(&self, collection: Collection) -> CoreResult<()> {
        Ok(self.registry.register(collection)?)
    }

    /// Resolve a collection by id.
    pub fn resolve_collection(&self, id: CollectionId) -> CoreResult<Collection> {
        Ok(self.registry.resolve(id)?)
    }

    /// Resolve a collection by alias.
    pub fn resolve_collection_alias(&self, alias: &str) -> CoreResult<Collection> {
        Ok(self.registry.resolve_alias(alias)?)
    }

    /// All registered collections, ordered by title.
    pub fn collections(&self) -> CoreResult<Vec<Collection>> {
        Ok(self.registry.list()?)
    }

    /// Report whether the collection offers reads.
    pub fn check_readable(&self, collection: &Collection) -> CoreResult<()> {
        Ok(self.registry.check_readable(collection)?)
    }

    /// Report whether the collection offers writes.
    pub fn check_writable(&self, collection: &Collection) -> CoreResult<()> {
        Ok(self.registry.check_writable(collection)?)
    }

    // ---- Object operations ----

    /// Add a single object synchronously.
    pub fn put_object(
        &self,
        collection: CollectionId,
        payload: Value,
    ) -> CoreResult<StixObjectRecord> {
        Ok(self.ledger.put_object(collection, payload)?)
    }

    /// All versions of an object matching the filter, version-ascending.
    pub fn get_object(
        &self,
        collection: CollectionId,
        id: &StixId,
        filter: &Filter,
    ) -> CoreResult<Vec<StixObjectRecord>> {
        Ok(self.ledger.get_object(collection, id, filter)?)
    }

    /// Version stamps of an object, ascending.
    pub fn object_versions(
        &self,
        collection: CollectionId,
        id: &StixId,
    ) -> CoreResult<Vec<Timestamp>> {
        Ok(self.ledger.object_versions(collection, id)?)
    }

    /// Remove exactly one version of an object.
    pub fn delete_object_version(
        &self,
        collection: CollectionId,
        id: &StixId,
        version: Timestamp,
    ) -> CoreResult<StixObjectRecord> {
        Ok(self.ledger.delete_object_version(collection, id, version)?)
    }

    /// One page of objects matching the filter.
    pub fn list_objects(
        &self,
        collection: CollectionId,
        filter: &Filter,
    ) -> CoreResult<Page<StixObjectRecord>> {
        Ok(self.ledger.list_objects(collection, filter, &self.limits)?)
    }

    /// One page of manifest entries matching the filter.
    pub fn list_manifest(
        &self,
        collection: CollectionId,
        filter: &Filter,
    ) -> CoreResult<Page<ManifestEntry>> {
        Ok(self.ledger.list_manifest(collection, filter, &self.limits)?)
    }

    // ---- Bulk add & status ----

    /// Accept a batch of objects for asynchronous ingestion.
    ///
    /// Returns the accept-time status resource (every object pending),
    /// which is the embedding layer's 202 response body. A worker task then ingests
    /// the batch, resolving each object to success or failure; clients
    /// poll [`TaxiiStore::get_status`] until the status completes.
    ///
    /// Must be called within a Tokio runtime.
    pub fn add_objects(
        &self,
        collection: CollectionId,
        objects: Vec<Value>,
    ) -> CoreResult<StatusResource> {
        let accepted_at = Timestamp::now();
        let items: Vec<BatchItem> = objects
            .into_iter()
            .enumerate()
            .map(|(i, payload)| BatchItem::classify(i, payload, accepted_at))
            .collect();

        let pendings = items.iter().map(BatchItem::pending_detail).collect();
        let status = self.statuses.create(collection, pendings)?;

        tokio::spawn(run_ingest(
            Arc::clone(&self.ledger),
            Arc::clone(&self.statuses),
            collection,
            status.id,
            items,
        ));

        Ok(status)
    }

    /// Fetch a status resource by id.
    pub fn get_status(&self, status_id: StatusId) -> CoreResult<StatusResource> {
        Ok(self.statuses.get(status_id)?)
    }
}

impl Default for TaxiiStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use taxii_status::OverallStatus;

    fn sid(s: &str) -> StixId {
        StixId::new(s).unwrap()
    }

    fn registered(store: &TaxiiStore) -> Collection {
        let coll = Collection::new("root-1").with_alias("root-1");
        store.register_collection(coll.clone()).unwrap();
        coll
    }

    async fn completed_status(store: &TaxiiStore, id: StatusId) -> StatusResource {
        for _ in 0..200 {
            let status = store.get_status(id).unwrap();
            if status.is_complete() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("status {id} did not complete in time");
    }

    #[tokio::test]
    async fn bulk_add_tracks_successes_and_failures() {
        let store = TaxiiStore::new();
        let coll = registered(&store);

        let accepted = store
            .add_objects(
                coll.id,
                vec![
                    json!({
                        "type": "indicator",
                        "id": "indicator--one",
                        "modified": "2021-01-01T00:00:00Z",
                    }),
                    json!({
                        "type": "indicator",
                        "id": "indicator--two",
                        "modified": "2021-01-02T00:00:00Z",
                    }),
                    // No id: fails during ingestion, not at accept.
                    json!({ "type": "indicator" }),
                ],
            )
            .unwrap();

        assert_eq!(accepted.total_count(), 3);
        assert_eq!(accepted.pending_count(), 3);
        assert_eq!(accepted.status(), OverallStatus::Pending);

        let done = completed_status(&store, accepted.id).await;
        assert_eq!(done.status(), OverallStatus::Complete);
        assert_eq!(done.success_count(), 2);
        assert_eq!(done.failure_count(), 1);
        assert_eq!(done.pending_count(), 0);
        assert!(done.failures[0].message.is_some());

        // The successes are now visible through the read path.
        let page = store.list_objects(coll.id, &Filter::default()).unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn facade_covers_the_full_object_lifecycle() {
        let store = TaxiiStore::new();
        let coll = registered(&store);

        store.check_readable(&coll).unwrap();
        store.check_writable(&coll).unwrap();
        assert_eq!(
            store.resolve_collection_alias("root-1").unwrap().id,
            coll.id
        );

        let record = store
            .put_object(
                coll.id,
                json!({
                    "type": "indicator",
                    "id": "indicator--x",
                    "created": "2021-01-01T00:00:00Z",
                    "modified": "2021-02-01T00:00:00Z",
                }),
            )
            .unwrap();

        let fetched = store
            .get_object(coll.id, &sid("indicator--x"), &Filter::default())
            .unwrap();
        assert_eq!(fetched, vec![record.clone()]);

        let versions = store.object_versions(coll.id, &sid("indicator--x")).unwrap();
        assert_eq!(versions, vec![record.version]);

        let manifest = store.list_manifest(coll.id, &Filter::default()).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.date_added_first, Some(record.date_added));

        store
            .delete_object_version(coll.id, &sid("indicator--x"), record.version)
            .unwrap();
        let manifest = store.list_manifest(coll.id, &Filter::default()).unwrap();
        assert!(manifest.is_empty());
    }

    #[tokio::test]
    async fn unknown_status_is_not_found() {
        let store = TaxiiStore::new();
        let err = store.get_status(StatusId::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Status(taxii_status::StatusError::StatusNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn permission_denials_surface_from_checks() {
        let store = TaxiiStore::new();
        let dropbox = Collection::new("Drop box").write_only();
        store.register_collection(dropbox.clone()).unwrap();

        let err = store.check_readable(&dropbox).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Registry(taxii_registry::RegistryError::ReadDenied { .. })
        ));
    }
}
