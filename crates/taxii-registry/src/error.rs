use taxii_types::CollectionId;

/// Errors produced by collection registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No collection matches the given id or alias.
    #[error("collection not found: {selector}")]
    CollectionNotFound { selector: String },

    /// A collection with this id is already registered.
    #[error("collection already registered: {id}")]
    DuplicateCollection { id: CollectionId },

    /// The alias is already bound to another collection.
    #[error("alias already in use: {alias}")]
    AliasTaken { alias: String },

    /// The collection does not grant read capability.
    #[error("collection {id} is not readable")]
    ReadDenied { id: CollectionId },

    /// The collection does not grant write capability.
    #[error("collection {id} is not writable")]
    WriteDenied { id: CollectionId },

    /// The registry's backing store is transiently unreachable.
    #[error("registry unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
