use serde::{Deserialize, Serialize};
use taxii_types::{MediaType, StixId, Timestamp};

/// Metadata projection of one stored object record.
///
/// Derived 1:1 from a ledger record when it is accepted, removed when the
/// record is deleted, never independently mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// The object id this entry describes.
    pub id: StixId,
    /// When this version of the object was added to the collection.
    pub date_added: Timestamp,
    /// The version of the object (STIX `modified`, else `created`, else
    /// server-assigned).
    pub version: Timestamp,
    /// The media type this version of the object is available in.
    pub media_type: MediaType,
}
