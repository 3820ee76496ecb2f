//! Filter and pagination engine for the TAXII object store.
//!
//! TAXII exposes the same query semantics across the objects, manifest, and
//! versions endpoints: a set of filter dimensions (`added_after`, `limit`,
//! `match[id]`, `match[type]`, `match[version]`, `match[spec_version]`) and
//! cursor-based pagination. This crate interprets those semantics once, for
//! every caller.
//!
//! Parsing is a pure function from a generic multimap of query keys/values
//! to a structured [`Filter`]; no framework interception is involved. The
//! caller (an HTTP layer outside this workspace) binds its query string into
//! the multimap and maps [`Page`] metadata back onto response headers.
//!
//! # Key Types
//!
//! - [`Filter`] — Parsed query constraints
//! - [`VersionSelect`] — `first` / `last` / exact version selection
//! - [`Cursor`] — Opaque resumption token over `(date_added, id)`
//! - [`Page`] — One page of results with `more`/`next` and header stamps
//! - [`PageLimits`] — Server default and maximum page sizes

pub mod cursor;
pub mod error;
pub mod filter;
pub mod page;

pub use cursor::Cursor;
pub use error::{FilterError, FilterResult};
pub use filter::{Filter, PageLimits, VersionSelect};
pub use page::Page;
