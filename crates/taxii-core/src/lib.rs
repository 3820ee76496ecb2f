//! Facade over the TAXII collection object store.
//!
//! This is the crate an embedding transport layer links against. It wires
//! the collection registry, the object ledger (with its manifest index),
//! and the status tracker into one [`TaxiiStore`] exposing the full call
//! surface: collection resolution and permission reporting, object
//! put/get/versions/delete, filtered and paginated object/manifest
//! listings, and asynchronous bulk-add with status polling.
//!
//! Routing, content negotiation, authentication, and wire DTO handling
//! live outside this workspace.

pub mod error;
mod ingest;
pub mod store;

pub use error::{CoreError, CoreResult};
pub use store::TaxiiStore;

// Re-export the component types embedders interact with.
pub use taxii_filter::{Cursor, Filter, FilterError, Page, PageLimits, VersionSelect};
pub use taxii_index::ManifestEntry;
pub use taxii_ledger::{LedgerError, LedgerReader, LedgerWriter, StixObjectRecord};
pub use taxii_registry::{Collection, CollectionRegistry, RegistryError};
pub use taxii_status::{
    OverallStatus, ResolveOutcome, StatusDetail, StatusError, StatusResource, StatusTracker,
};
pub use taxii_types::{CollectionId, MediaType, StatusId, StixId, Timestamp};
