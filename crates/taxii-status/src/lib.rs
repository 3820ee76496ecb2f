//! Status tracking for TAXII bulk-add requests.
//!
//! A bulk add is accepted synchronously and ingested asynchronously; the
//! status resource is what the client polls while that happens. This crate
//! owns the lifecycle: a status starts with every object pending, each
//! object resolves to success or failure exactly once, and the status
//! becomes complete, and immutable, when nothing is left pending.
//!
//! Partial failure is a normal outcome for a batch, not an error state:
//! only individual objects succeed or fail.
//!
//! # Key Types
//!
//! - [`StatusResource`] — One bulk-add request's lifecycle state
//! - [`StatusDetail`] — Outcome of a single object within the batch
//! - [`OverallStatus`] — `pending` / `complete`
//! - [`StatusTracker`] — Concurrent store of status resources

pub mod error;
pub mod resource;
pub mod tracker;

pub use error::{StatusError, StatusResult};
pub use resource::{OverallStatus, ResolveOutcome, StatusDetail, StatusResource};
pub use tracker::StatusTracker;
