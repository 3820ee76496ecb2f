//! Foundation types for the TAXII collection object store.
//!
//! This crate provides the identifier, temporal, and media-type value types
//! used throughout the store. Every other crate in the workspace depends on
//! `taxii-types`.
//!
//! # Key Types
//!
//! - [`StixId`] — A STIX object identifier (`type--uuid` form)
//! - [`CollectionId`] — Universally unique collection identifier
//! - [`StatusId`] — Time-ordered identifier for a status resource (UUID v7)
//! - [`Timestamp`] — RFC 3339 instant with total ordering
//! - [`MediaType`] — Plain `{type, subtype, version}` media-type value

pub mod error;
pub mod identifier;
pub mod media;
pub mod timestamp;

pub use error::TypeError;
pub use identifier::{CollectionId, StatusId, StixId};
pub use media::MediaType;
pub use timestamp::Timestamp;
