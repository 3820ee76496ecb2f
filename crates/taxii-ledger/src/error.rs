use taxii_types::{StixId, Timestamp};

/// Errors produced by object ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The object id has no records in the collection.
    #[error("object not found: {id}")]
    ObjectNotFound { id: StixId },

    /// The object exists but not at the named version.
    #[error("version {version} not found for object {id}")]
    VersionNotFound { id: StixId, version: Timestamp },

    /// The payload could not be parsed into id/version/media type.
    #[error("invalid object payload: {reason}")]
    InvalidObject { reason: String },

    /// A filter or pagination parameter was malformed.
    #[error(transparent)]
    Filter(#[from] taxii_filter::FilterError),

    /// The ledger and its manifest index disagreed.
    #[error("manifest index inconsistency: {0}")]
    Index(#[from] taxii_index::IndexError),

    /// The storage backend is transiently unreachable; callers may retry
    /// with backoff.
    #[error("ledger unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Convenience alias for ledger results.
pub type LedgerResult<T> = Result<T, LedgerError>;
