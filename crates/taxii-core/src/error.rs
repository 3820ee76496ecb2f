/// Unified error for facade operations.
///
/// Each component keeps its own typed error; this wrapper is what the
/// embedding layer matches on to pick a transport-level response. The
/// mapping from error kind to status code is entirely the embedder's.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Registry(#[from] taxii_registry::RegistryError),

    #[error(transparent)]
    Ledger(#[from] taxii_ledger::LedgerError),

    #[error(transparent)]
    Status(#[from] taxii_status::StatusError),

    #[error(transparent)]
    Filter(#[from] taxii_filter::FilterError),
}

/// Convenience alias for facade results.
pub type CoreResult<T> = Result<T, CoreError>;
