//! Collection registry for the TAXII object store.
//!
//! Collections are created by administrative configuration and are
//! immutable during request processing; only their ledger contents change.
//! The registry resolves a collection id (or its alias) to the metadata and
//! permission set the caller needs before touching the ledger.
//!
//! Permission checks here *report* capability, they never enforce it;
//! enforcement against the authenticated identity belongs to the caller's
//! authorization collaborator.
//!
//! # Key Types
//!
//! - [`Collection`] — Collection metadata and capability flags
//! - [`CollectionRegistry`] — Id/alias resolution and permission reporting

pub mod collection;
pub mod error;
pub mod registry;

pub use collection::Collection;
pub use error::{RegistryError, RegistryResult};
pub use registry::CollectionRegistry;
