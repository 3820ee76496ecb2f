/// Errors produced when interpreting query parameters.
///
/// Every variant maps to a malformed or out-of-range request-side value;
/// none of them are retriable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// `limit` was not a positive integer.
    #[error("limit must be a positive integer, got: {value}")]
    InvalidLimit { value: String },

    /// `added_after` was not a valid RFC 3339 timestamp.
    #[error("added_after must be a valid timestamp, got: {value}")]
    InvalidAddedAfter { value: String },

    /// A `match[version]` value was neither `first`, `last`, nor a timestamp.
    #[error("invalid version selector: {value}")]
    InvalidVersionSelector { value: String },

    /// A `match[id]` value was not a usable object id.
    #[error("invalid id filter value: {value}")]
    InvalidIdValue { value: String },

    /// The `next` token did not decode to a cursor this server issued.
    #[error("invalid pagination cursor")]
    InvalidCursor,
}

/// Convenience alias for filter results.
pub type FilterResult<T> = Result<T, FilterError>;
