/// Errors produced when parsing foundation types from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },

    #[error("invalid STIX object id: {value}: {reason}")]
    InvalidStixId { value: String, reason: String },

    #[error("invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    #[error("invalid media type: {value}: {reason}")]
    InvalidMediaType { value: String, reason: String },
}
