use std::sync::Arc;

use serde_json::Value;
use taxii_ledger::{InMemoryLedger, LedgerWriter, RecordDraft};
use taxii_status::{ResolveOutcome, StatusDetail, StatusTracker};
use taxii_types::{CollectionId, StatusId, StixId, Timestamp};
use tracing::{info, warn};

/// One object of an accepted batch, as the worker will process it.
///
/// Payloads that failed to parse at accept time still occupy a batch slot
/// (the status total must equal the envelope size); they carry the parse
/// error and resolve straight to failure without touching the ledger.
pub(crate) struct BatchItem {
    pub payload: Value,
    pub id: StixId,
    pub version: Timestamp,
    pub reject: Option<String>,
}

impl BatchItem {
    /// Classify one payload at accept time.
    ///
    /// A parse failure is not an error for the accept call: the item is
    /// admitted under a server-assigned id and fails during ingestion, the
    /// way any other per-object failure would.
    pub(crate) fn classify(index: usize, payload: Value, accepted_at: Timestamp) -> Self {
        match RecordDraft::from_payload(payload.clone()) {
            Ok(draft) => Self {
                payload,
                id: draft.id,
                version: draft.version.unwrap_or(accepted_at),
                reject: None,
            },
            Err(e) => Self {
                payload,
                // The envelope slot needs an id; the object offered none
                // usable. Position-based ids keep slots distinguishable.
                id: StixId::new(format!("invalid--{index}")).expect("static id"),
                version: accepted_at,
                reject: Some(e.to_string()),
            },
        }
    }

    /// The accept-time pending entry for this item.
    pub(crate) fn pending_detail(&self) -> StatusDetail {
        StatusDetail::new(self.id.clone(), self.version)
    }
}

/// Ingest an accepted batch, resolving each object's status entry.
///
/// Runs on its own task, one worker per batch. Partial failure is the
/// expected shape of the outcome: each object succeeds or fails on its
/// own and the batch always runs to completion.
pub(crate) async fn run_ingest(
    ledger: Arc<InMemoryLedger>,
    statuses: Arc<StatusTracker>,
    collection: CollectionId,
    status_id: StatusId,
    items: Vec<BatchItem>,
) {
    info!(status = %status_id, collection = %collection, count = items.len(), "ingest started");

    for item in items {
        let resolution = match item.reject {
            Some(reason) => statuses.resolve(
                status_id,
                &item.id,
                item.version,
                ResolveOutcome::Failure,
                Some(reason),
            ),
            None => match ledger.put_object(collection, item.payload) {
                Ok(record) => statuses.resolve(
                    status_id,
                    &record.id,
                    record.version,
                    ResolveOutcome::Success,
                    None,
                ),
                Err(e) => {
                    warn!(status = %status_id, object = %item.id, error = %e, "object failed to ledger");
                    statuses.resolve(
                        status_id,
                        &item.id,
                        item.version,
                        ResolveOutcome::Failure,
                        Some(e.to_string()),
                    )
                }
            },
        };

        if let Err(e) = resolution {
            // The status entry disappeared under us; nothing to redo, the
            // ledger write (if any) already stands.
            warn!(status = %status_id, object = %item.id, error = %e, "status resolution failed");
        }
    }

    info!(status = %status_id, "ingest finished");
}
