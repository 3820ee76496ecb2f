//! Manifest index for the TAXII object store.
//!
//! The manifest endpoint answers "what is in this collection" without
//! materializing object payloads. This crate keeps the metadata projection:
//! one [`ManifestEntry`] per ledgered record, ordered by `(date_added, id)`
//! so that cursor scans are a range query rather than a payload walk.
//!
//! The index is derived state. Only the object ledger mutates it, under the
//! same write guard as the ledger append or delete, so an entry never exists
//! without its backing record and vice versa.
//!
//! # Key Types
//!
//! - [`ManifestEntry`] — Metadata projection of one stored record
//! - [`ManifestIndex`] — The ordered index with cursor range scans

pub mod entry;
pub mod error;
pub mod index;

pub use entry::ManifestEntry;
pub use error::{IndexError, IndexResult};
pub use index::ManifestIndex;
