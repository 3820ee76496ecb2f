//! Append-only versioned object ledger for the TAXII store.
//!
//! This crate is the source of truth for object content. It provides:
//! - [`StixObjectRecord`] and payload parsing (id, version fallback chain,
//!   spec version)
//! - The [`AddedClock`] producing strictly monotonic `date_added` stamps
//!   per collection
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - [`InMemoryLedger`], which updates the ledger and its manifest index
//!   as one atomic unit per write
//!
//! Listing semantics follow TAXII 2.1: the objects and manifest endpoints
//! return the latest matching version per object unless a version selector
//! says otherwise, in `(date_added, id)` order, paginated by opaque cursor.

pub mod clock;
pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use clock::AddedClock;
pub use error::{LedgerError, LedgerResult};
pub use memory::InMemoryLedger;
pub use record::{RecordDraft, StixObjectRecord};
pub use traits::{LedgerReader, LedgerWriter};
