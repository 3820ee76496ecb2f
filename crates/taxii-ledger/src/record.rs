use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use taxii_index::ManifestEntry;
use taxii_types::{MediaType, StixId, Timestamp};

use crate::error::{LedgerError, LedgerResult};

/// One stored version of a STIX object within a collection.
///
/// `(id, version)` uniquely identifies a record; all versions of one id
/// form its version chain, ordered by version stamp. The payload is an
/// opaque structured document; the ledger never interprets STIX semantics
/// beyond the identity fields parsed at ingest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StixObjectRecord {
    /// The STIX object id.
    pub id: StixId,
    /// Version stamp: the payload's `modified`, else `created`, else a
    /// server-assigned stamp.
    pub version: Timestamp,
    /// The STIX spec version this object claims (`spec_version`, default 2.1).
    pub spec_version: String,
    /// Media type this record is available in (derived from `spec_version`).
    pub media_type: MediaType,
    /// When this record was added to the collection (server-assigned,
    /// strictly monotonic per collection).
    pub date_added: Timestamp,
    /// The full object document as received.
    pub payload: Map<String, Value>,
}

impl StixObjectRecord {
    /// The manifest projection of this record.
    pub fn manifest_entry(&self) -> ManifestEntry {
        ManifestEntry {
            id: self.id.clone(),
            date_added: self.date_added,
            version: self.version,
            media_type: self.media_type.clone(),
        }
    }
}

/// A parsed-but-not-yet-ledgered object: everything `put_object` derives
/// from the payload before the ledger assigns `date_added`.
#[derive(Clone, Debug)]
pub struct RecordDraft {
    /// The STIX object id.
    pub id: StixId,
    /// Version from `modified`/`created`; `None` means the server assigns
    /// one at ledger time.
    pub version: Option<Timestamp>,
    /// Claimed spec version, default 2.1.
    pub spec_version: String,
    /// The full object document.
    pub payload: Map<String, Value>,
}

impl RecordDraft {
    /// Parse an incoming payload into the fields the ledger needs.
    ///
    /// Fails with [`LedgerError::InvalidObject`] when the payload is not a
    /// JSON object, has no usable `id`, or carries a `modified`/`created`/
    /// `spec_version` field of the wrong shape.
    pub fn from_payload(payload: Value) -> LedgerResult<Self> {
        let map = match payload {
            Value::Object(map) => map,
            other => {
                return Err(LedgerError::InvalidObject {
                    reason: format!("payload must be a JSON object, got {}", kind_of(&other)),
                })
            }
        };

        let id = match map.get("id") {
            Some(Value::String(raw)) => {
                StixId::new(raw.clone()).map_err(|e| LedgerError::InvalidObject {
                    reason: e.to_string(),
                })?
            }
            Some(_) => {
                return Err(LedgerError::InvalidObject {
                    reason: "id must be a string".into(),
                })
            }
            None => {
                return Err(LedgerError::InvalidObject {
                    reason: "payload has no id".into(),
                })
            }
        };

        let version = version_field(&map)?;

        let spec_version = match map.get("spec_version") {
            Some(Value::String(v)) => v.clone(),
            Some(_) => {
                return Err(LedgerError::InvalidObject {
                    reason: "spec_version must be a string".into(),
                })
            }
            None => "2.1".to_string(),
        };

        Ok(Self {
            id,
            version,
            spec_version,
            payload: map,
        })
    }

    /// The media type records of this draft are served under.
    pub fn media_type(&self) -> MediaType {
        MediaType {
            type_: "application".into(),
            subtype: "stix+json".into(),
            version: Some(self.spec_version.clone()),
        }
    }
}

/// Version fallback chain: `modified`, else `created`, else none.
fn version_field(map: &Map<String, Value>) -> LedgerResult<Option<Timestamp>> {
    for field in ["modified", "created"] {
        match map.get(field) {
            Some(Value::String(raw)) => {
                let stamp = Timestamp::parse(raw).map_err(|_| LedgerError::InvalidObject {
                    reason: format!("{field} is not a valid timestamp: {raw}"),
                })?;
                return Ok(Some(stamp));
            }
            Some(_) => {
                return Err(LedgerError::InvalidObject {
                    reason: format!("{field} must be a timestamp string"),
                })
            }
            None => continue,
        }
    }
    Ok(None)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_modified_as_version() {
        let draft = RecordDraft::from_payload(json!({
            "id": "indicator--a",
            "created": "2020-01-01T00:00:00Z",
            "modified": "2020-02-01T00:00:00Z",
            "spec_version": "2.1",
        }))
        .unwrap();
        assert_eq!(
            draft.version,
            Some(Timestamp::parse("2020-02-01T00:00:00Z").unwrap())
        );
    }

    #[test]
    fn falls_back_to_created() {
        let draft = RecordDraft::from_payload(json!({
            "id": "marking-definition--b",
            "created": "2020-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(
            draft.version,
            Some(Timestamp::parse("2020-01-01T00:00:00Z").unwrap())
        );
    }

    #[test]
    fn unversioned_payload_leaves_version_to_the_server() {
        let draft = RecordDraft::from_payload(json!({ "id": "observed-data--c" })).unwrap();
        assert_eq!(draft.version, None);
        assert_eq!(draft.spec_version, "2.1");
    }

    #[test]
    fn rejects_non_object_payloads() {
        for payload in [json!(null), json!([1, 2]), json!("text")] {
            let err = RecordDraft::from_payload(payload).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidObject { .. }));
        }
    }

    #[test]
    fn rejects_missing_or_malformed_id() {
        let err = RecordDraft::from_payload(json!({ "type": "indicator" })).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidObject { .. }));

        let err = RecordDraft::from_payload(json!({ "id": 42 })).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidObject { .. }));
    }

    #[test]
    fn rejects_unparseable_version() {
        let err = RecordDraft::from_payload(json!({
            "id": "indicator--a",
            "modified": "last tuesday",
        }))
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidObject { .. }));
    }

    #[test]
    fn media_type_carries_spec_version() {
        let draft = RecordDraft::from_payload(json!({
            "id": "indicator--a",
            "spec_version": "2.0",
        }))
        .unwrap();
        assert_eq!(
            draft.media_type().to_string(),
            "application/stix+json;version=2.0"
        );
    }
}
