use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A STIX object identifier.
///
/// STIX ids take the form `type--uuid`, e.g.
/// `indicator--8e2e2d2b-17d4-4cbf-938f-98ee46b3cd3f`. The store treats the
/// payload as opaque, but the id's type prefix is a queryable dimension
/// (`match[type]`), so it is surfaced here.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StixId(String);

impl StixId {
    /// Wrap a raw id string, rejecting empty input.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TypeError::InvalidStixId {
                value: raw,
                reason: "id must not be empty".into(),
            });
        }
        Ok(Self(raw))
    }

    /// The full id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The STIX type prefix, when the id carries one.
    ///
    /// `indicator--8e2e...` yields `Some("indicator")`; an id without the
    /// `--` separator has no type and never matches a `match[type]` filter.
    pub fn object_type(&self) -> Option<&str> {
        self.0.split_once("--").map(|(t, _)| t).filter(|t| !t.is_empty())
    }
}

impl FromStr for StixId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for StixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for StixId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StixId({})", self.0)
    }
}

/// Universally unique identifier of a collection.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(uuid::Uuid);

impl CollectionId {
    /// Generate a fresh random collection id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from the canonical hyphenated form.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| TypeError::InvalidIdentifier {
                value: value.to_string(),
            })
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for CollectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionId({})", self.0)
    }
}

/// Identifier of a status resource (UUID v7 for time-ordering).
///
/// Status resources are created in request order, so a time-ordered id keeps
/// iteration and debugging output chronological for free.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusId(uuid::Uuid);

impl StatusId {
    /// Generate a new time-ordered status id.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from the canonical hyphenated form.
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| TypeError::InvalidIdentifier {
                value: value.to_string(),
            })
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for StatusId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusId({})", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stix_id_type_prefix() {
        let id = StixId::new("indicator--8e2e2d2b-17d4-4cbf-938f-98ee46b3cd3f").unwrap();
        assert_eq!(id.object_type(), Some("indicator"));
    }

    #[test]
    fn stix_id_without_separator_has_no_type() {
        let id = StixId::new("opaque-identifier").unwrap();
        assert_eq!(id.object_type(), None);
    }

    #[test]
    fn stix_id_rejects_empty() {
        assert!(StixId::new("").is_err());
        assert!(StixId::new("   ").is_err());
    }

    #[test]
    fn collection_id_parse_roundtrip() {
        let id = CollectionId::new();
        let parsed = CollectionId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn collection_id_rejects_garbage() {
        let err = CollectionId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, TypeError::InvalidIdentifier { .. }));
    }

    #[test]
    fn status_ids_are_unique_and_time_ordered() {
        let a = StatusId::new();
        let b = StatusId::new();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn status_id_short_format() {
        assert_eq!(StatusId::new().short_id().len(), 8);
    }
}
