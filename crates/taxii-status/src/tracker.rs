use std::collections::HashMap;
use std::sync::RwLock;

use taxii_types::{CollectionId, StatusId, StixId, Timestamp};
use tracing::{debug, info};

use crate::error::{StatusError, StatusResult};
use crate::resource::{ResolveOutcome, StatusDetail, StatusResource};

/// Concurrent store of status resources.
///
/// Statuses live independently of any collection: each one spans a single
/// bulk-add request and merely references the collection it addressed.
/// `resolve` takes the write lock for the duration of one entry move, so
/// concurrent workers resolving into the same status serialize per call and
/// the count invariant can never be observed mid-transition.
///
/// Completed statuses are retained; eviction is the embedding process's
/// retention policy.
pub struct StatusTracker {
    statuses: RwLock<HashMap<StatusId, StatusResource>>,
}

impl StatusTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            statuses: RwLock::new(HashMap::new()),
        }
    }

    /// Accept a bulk-add batch, recording every object as pending.
    ///
    /// Returns the created resource; the caller hands its id to the client
    /// and to the ingestion worker.
    pub fn create(
        &self,
        collection: CollectionId,
        pendings: Vec<StatusDetail>,
    ) -> StatusResult<StatusResource> {
        let status = StatusResource::accept(collection, pendings);
        let mut statuses = self.write_statuses()?;
        statuses.insert(status.id, status.clone());
        debug!(status = %status.id, collection = %collection, total = status.total_count(), "status created");
        Ok(status)
    }

    /// Resolve one object of a batch to success or failure.
    ///
    /// Fails with [`StatusError::AlreadyComplete`] once the status has
    /// completed, and [`StatusError::PendingEntryNotFound`] when no pending
    /// entry matches the object. A failed call leaves the status unchanged.
    pub fn resolve(
        &self,
        status_id: StatusId,
        object_id: &StixId,
        version: Timestamp,
        outcome: ResolveOutcome,
        message: Option<String>,
    ) -> StatusResult<()> {
        let mut statuses = self.write_statuses()?;
        let status = statuses
            .get_mut(&status_id)
            .ok_or(StatusError::StatusNotFound { id: status_id })?;

        if status.is_complete() {
            return Err(StatusError::AlreadyComplete { id: status_id });
        }
        if !status.resolve_entry(object_id, version, outcome, message) {
            return Err(StatusError::PendingEntryNotFound {
                status: status_id,
                object: object_id.clone(),
            });
        }

        debug!(status = %status_id, object = %object_id, ?outcome, "object resolved");
        if status.is_complete() {
            info!(
                status = %status_id,
                succeeded = status.success_count(),
                failed = status.failure_count(),
                "bulk add complete"
            );
        }
        Ok(())
    }

    /// Fetch a status resource by id.
    pub fn get(&self, status_id: StatusId) -> StatusResult<StatusResource> {
        let statuses = self.read_statuses()?;
        statuses
            .get(&status_id)
            .cloned()
            .ok_or(StatusError::StatusNotFound { id: status_id })
    }

    /// Number of tracked statuses.
    pub fn len(&self) -> usize {
        self.statuses.read().expect("status lock poisoned").len()
    }

    /// Returns `true` if no statuses are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_statuses(
        &self,
    ) -> StatusResult<std::sync::RwLockReadGuard<'_, HashMap<StatusId, StatusResource>>> {
        self.statuses.read().map_err(|_| StatusError::Unavailable {
            reason: "status read lock poisoned".into(),
        })
    }

    fn write_statuses(
        &self,
    ) -> StatusResult<std::sync::RwLockWriteGuard<'_, HashMap<StatusId, StatusResource>>> {
        self.statuses.write().map_err(|_| StatusError::Unavailable {
            reason: "status write lock poisoned".into(),
        })
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::OverallStatus;
    use std::sync::Arc;
    use std::thread;

    fn sid(s: &str) -> StixId {
        StixId::new(s).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn pendings(n: usize) -> Vec<StatusDetail> {
        (0..n)
            .map(|i| {
                StatusDetail::new(
                    sid(&format!("indicator--{i}")),
                    ts("2021-01-01T00:00:00Z"),
                )
            })
            .collect()
    }

    #[test]
    fn three_object_batch_runs_to_completion() {
        let tracker = StatusTracker::new();
        let status = tracker.create(CollectionId::new(), pendings(3)).unwrap();
        assert_eq!(status.total_count(), 3);
        assert_eq!(status.pending_count(), 3);
        assert_eq!(status.status(), OverallStatus::Pending);

        for (i, outcome) in [
            ResolveOutcome::Success,
            ResolveOutcome::Success,
            ResolveOutcome::Failure,
        ]
        .into_iter()
        .enumerate()
        {
            tracker
                .resolve(
                    status.id,
                    &sid(&format!("indicator--{i}")),
                    ts("2021-01-01T00:00:00Z"),
                    outcome,
                    None,
                )
                .unwrap();
        }

        let done = tracker.get(status.id).unwrap();
        assert_eq!(done.status(), OverallStatus::Complete);
        assert_eq!(done.success_count(), 2);
        assert_eq!(done.failure_count(), 1);
        assert_eq!(done.pending_count(), 0);
    }

    #[test]
    fn completed_status_is_immutable() {
        let tracker = StatusTracker::new();
        let status = tracker.create(CollectionId::new(), pendings(1)).unwrap();
        tracker
            .resolve(
                status.id,
                &sid("indicator--0"),
                ts("2021-01-01T00:00:00Z"),
                ResolveOutcome::Success,
                None,
            )
            .unwrap();

        let err = tracker
            .resolve(
                status.id,
                &sid("indicator--0"),
                ts("2021-01-01T00:00:00Z"),
                ResolveOutcome::Failure,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, StatusError::AlreadyComplete { .. }));
    }

    #[test]
    fn unknown_status_and_entry_are_not_found() {
        let tracker = StatusTracker::new();
        let err = tracker.get(StatusId::new()).unwrap_err();
        assert!(matches!(err, StatusError::StatusNotFound { .. }));

        let status = tracker.create(CollectionId::new(), pendings(1)).unwrap();
        let err = tracker
            .resolve(
                status.id,
                &sid("indicator--nope"),
                ts("2021-01-01T00:00:00Z"),
                ResolveOutcome::Success,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, StatusError::PendingEntryNotFound { .. }));
    }

    #[test]
    fn concurrent_resolvers_keep_the_counts_balanced() {
        let tracker = Arc::new(StatusTracker::new());
        let status = tracker.create(CollectionId::new(), pendings(64)).unwrap();

        let mut handles = Vec::new();
        for t in 0..8 {
            let tracker = Arc::clone(&tracker);
            let status_id = status.id;
            handles.push(thread::spawn(move || {
                for i in (t..64).step_by(8) {
                    let outcome = if i % 3 == 0 {
                        ResolveOutcome::Failure
                    } else {
                        ResolveOutcome::Success
                    };
                    tracker
                        .resolve(
                            status_id,
                            &sid(&format!("indicator--{i}")),
                            ts("2021-01-01T00:00:00Z"),
                            outcome,
                            None,
                        )
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let done = tracker.get(status.id).unwrap();
        assert_eq!(done.status(), OverallStatus::Complete);
        assert_eq!(done.total_count(), 64);
        assert_eq!(done.success_count() + done.failure_count(), 64);
    }
}
