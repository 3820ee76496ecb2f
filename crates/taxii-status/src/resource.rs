use serde::{Deserialize, Serialize};
use taxii_types::{CollectionId, StatusId, StixId, Timestamp};

/// Overall state of a bulk-add request.
///
/// `Complete` means the resource will not change again and may be
/// garbage-collected by the embedding process's retention policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Pending,
    Complete,
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Per-object resolution within a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The object was ledgered.
    Success,
    /// The object could not be ledgered; the batch itself is unaffected.
    Failure,
}

/// The outcome (or pending state) of one object within a bulk-add batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDetail {
    /// The object id, as the server identified it at accept time.
    pub id: StixId,
    /// The object's version stamp.
    pub version: Timestamp,
    /// More information about the outcome or pending state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusDetail {
    /// A detail with no message.
    pub fn new(id: StixId, version: Timestamp) -> Self {
        Self {
            id,
            version,
            message: None,
        }
    }
}

/// Lifecycle state of one bulk-add request.
///
/// The counts are derived from the three outcome lists, so
/// `total == success + failure + pending` holds at every point in the
/// resource's lifetime by construction: entries only ever move from
/// `pendings` to `successes` or `failures`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResource {
    /// Identifier of this status resource.
    pub id: StatusId,
    /// The collection the batch was addressed to.
    pub collection: CollectionId,
    /// When the bulk-add request was accepted.
    pub request_timestamp: Timestamp,
    /// Objects successfully ledgered.
    pub successes: Vec<StatusDetail>,
    /// Objects that failed to ledger.
    pub failures: Vec<StatusDetail>,
    /// Objects not yet processed.
    pub pendings: Vec<StatusDetail>,
}

impl StatusResource {
    /// Accept a batch: every object starts pending.
    pub fn accept(collection: CollectionId, pendings: Vec<StatusDetail>) -> Self {
        Self {
            id: StatusId::new(),
            collection,
            request_timestamp: Timestamp::now(),
            successes: Vec::new(),
            failures: Vec::new(),
            pendings,
        }
    }

    /// The overall status: complete exactly when nothing is pending.
    pub fn status(&self) -> OverallStatus {
        if self.pendings.is_empty() {
            OverallStatus::Complete
        } else {
            OverallStatus::Pending
        }
    }

    /// Returns `true` once every object has resolved.
    pub fn is_complete(&self) -> bool {
        self.pendings.is_empty()
    }

    /// Number of objects in the original request.
    pub fn total_count(&self) -> usize {
        self.successes.len() + self.failures.len() + self.pendings.len()
    }

    /// Number of objects successfully ledgered so far.
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of objects that failed so far.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of objects still awaiting processing.
    pub fn pending_count(&self) -> usize {
        self.pendings.len()
    }

    /// Move one pending entry to the outcome lists.
    ///
    /// The entry is matched by object id, preferring an exact version
    /// match: a batch may legitimately carry several versions of one id,
    /// and the ledger may have assigned a server version the accept-time
    /// entry could not know. The resolved detail records the version and
    /// message passed here. Returns `false` when no pending entry matches.
    pub(crate) fn resolve_entry(
        &mut self,
        object_id: &StixId,
        version: Timestamp,
        outcome: ResolveOutcome,
        message: Option<String>,
    ) -> bool {
        let position = self
            .pendings
            .iter()
            .position(|d| d.id == *object_id && d.version == version)
            .or_else(|| self.pendings.iter().position(|d| d.id == *object_id));

        let Some(position) = position else {
            return false;
        };

        let mut detail = self.pendings.remove(position);
        detail.version = version;
        detail.message = message;
        match outcome {
            ResolveOutcome::Success => self.successes.push(detail),
            ResolveOutcome::Failure => self.failures.push(detail),
        }
        true
    }
}
