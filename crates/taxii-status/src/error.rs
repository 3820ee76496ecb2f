use taxii_types::{StatusId, StixId};

/// Errors produced by status tracker operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// No status resource with this id exists.
    #[error("status not found: {id}")]
    StatusNotFound { id: StatusId },

    /// The status has no pending entry for this object.
    #[error("no pending entry for object {object} in status {status}")]
    PendingEntryNotFound { status: StatusId, object: StixId },

    /// The status already completed and must not be mutated further.
    #[error("status {id} is complete and immutable")]
    AlreadyComplete { id: StatusId },

    /// The tracker's backing store is transiently unreachable.
    #[error("status tracker unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Convenience alias for status results.
pub type StatusResult<T> = Result<T, StatusError>;
