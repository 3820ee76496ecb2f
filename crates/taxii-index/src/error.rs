use taxii_types::{StixId, Timestamp};

/// Errors produced by manifest index mutations.
///
/// The ledger mutates the index under its own write guard, so either
/// variant surfacing means ledger and index disagreed: an integrity
/// violation, not a caller mistake.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("manifest entry already present for {id} at {date_added}")]
    DuplicateEntry { id: StixId, date_added: Timestamp },

    #[error("manifest entry missing for {id} at {date_added}")]
    MissingEntry { id: StixId, date_added: Timestamp },
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
