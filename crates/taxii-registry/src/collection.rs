use serde::{Deserialize, Serialize};
use taxii_types::{CollectionId, MediaType};

/// Metadata and capability flags for one collection.
///
/// `can_read` / `can_write` describe what the collection offers, not what
/// any particular client may do; identity-aware enforcement sits outside
/// this core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Universally unique collection id.
    pub id: CollectionId,
    /// Human-readable title.
    pub title: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Human-readable alias, unique within the registry when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Whether objects can be retrieved from this collection.
    pub can_read: bool,
    /// Whether objects can be added to this collection.
    pub can_write: bool,
    /// Media types objects in this collection can be stored and served in.
    pub media_types: Vec<MediaType>,
}

impl Collection {
    /// A readable, writable collection with the default media type
    /// (`application/stix+json;version=2.1`) and a fresh id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: CollectionId::new(),
            title: title.into(),
            description: None,
            alias: None,
            can_read: true,
            can_write: true,
            media_types: vec![MediaType::stix_2_1()],
        }
    }

    /// Replace the generated id (for configuration-driven registration).
    pub fn with_id(mut self, id: CollectionId) -> Self {
        self.id = id;
        self
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Restrict the collection to reads.
    pub fn read_only(mut self) -> Self {
        self.can_write = false;
        self
    }

    /// Restrict the collection to writes (a drop-box collection).
    pub fn write_only(mut self) -> Self {
        self.can_read = false;
        self
    }

    /// Replace the supported media types.
    pub fn with_media_types(mut self, media_types: Vec<MediaType>) -> Self {
        self.media_types = media_types;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_read_write_stix_2_1() {
        let coll = Collection::new("Enterprise indicators");
        assert!(coll.can_read);
        assert!(coll.can_write);
        assert_eq!(coll.media_types, vec![MediaType::stix_2_1()]);
        assert!(coll.alias.is_none());
    }

    #[test]
    fn builders_compose() {
        let coll = Collection::new("Drop box")
            .with_alias("dropbox")
            .with_description("Write-only intake")
            .write_only();
        assert_eq!(coll.alias.as_deref(), Some("dropbox"));
        assert!(!coll.can_read);
        assert!(coll.can_write);
    }
}
