use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// TAXII content media type: `application/taxii+json;version=2.1`.
pub const APPLICATION_TAXII_JSON: &str = "application/taxii+json";
/// STIX content media type: `application/stix+json;version=2.1`.
pub const APPLICATION_STIX_JSON: &str = "application/stix+json";
/// Version parameter assumed when a media type carries none.
pub const DEFAULT_VERSION: &str = "2.1";

/// A media type as a plain `{type, subtype, version}` value.
///
/// TAXII distinguishes content by the `version` parameter on two media
/// types (`application/taxii+json` for protocol resources,
/// `application/stix+json` for object content). A missing version parameter
/// means 2.1. Parsing lowercases the type and subtype; unrecognized
/// parameters are dropped.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaType {
    /// Top-level type, e.g. `application`.
    #[serde(rename = "type")]
    pub type_: String,
    /// Subtype, e.g. `stix+json`.
    pub subtype: String,
    /// The `version` parameter, when present.
    pub version: Option<String>,
}

impl MediaType {
    /// `application/taxii+json;version=2.1`
    pub fn taxii_2_1() -> Self {
        Self::with_version(APPLICATION_TAXII_JSON, "2.1")
    }

    /// `application/taxii+json;version=2.0`
    pub fn taxii_2_0() -> Self {
        Self::with_version(APPLICATION_TAXII_JSON, "2.0")
    }

    /// `application/stix+json;version=2.1`
    pub fn stix_2_1() -> Self {
        Self::with_version(APPLICATION_STIX_JSON, "2.1")
    }

    /// `application/stix+json;version=2.0`
    pub fn stix_2_0() -> Self {
        Self::with_version(APPLICATION_STIX_JSON, "2.0")
    }

    fn with_version(essence: &str, version: &str) -> Self {
        let (type_, subtype) = essence.split_once('/').expect("static essence");
        Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
            version: Some(version.to_string()),
        }
    }

    /// Parse a raw media-type string such as
    /// `application/stix+json;version=2.1` or `*/*`.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let mut parts = raw.split(';');
        let essence = parts.next().unwrap_or_default().trim().to_ascii_lowercase();

        let (type_, subtype) =
            essence
                .split_once('/')
                .ok_or_else(|| TypeError::InvalidMediaType {
                    value: raw.to_string(),
                    reason: "missing '/' separator".into(),
                })?;
        if type_.is_empty() || subtype.is_empty() {
            return Err(TypeError::InvalidMediaType {
                value: raw.to_string(),
                reason: "empty type or subtype".into(),
            });
        }

        let version = parts
            .filter_map(|p| p.trim().split_once('='))
            .find(|(k, _)| k.trim().eq_ignore_ascii_case("version"))
            .map(|(_, v)| v.trim().to_string());

        Ok(Self {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
            version,
        })
    }

    /// The `type/subtype` part without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    /// The version parameter, defaulting to 2.1 when absent.
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }

    /// Returns `true` for the `*/*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.type_ == "*" && self.subtype == "*"
    }

    /// Returns `true` if `other` names the same content as `self`,
    /// treating a missing version parameter as 2.1 on either side.
    pub fn accepts(&self, other: &Self) -> bool {
        if self.is_wildcard() || other.is_wildcard() {
            return true;
        }
        self.essence() == other.essence()
            && self.version_or_default() == other.version_or_default()
    }
}

impl FromStr for MediaType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}/{};version={}", self.type_, self.subtype, v),
            None => write!(f, "{}/{}", self.type_, self.subtype),
        }
    }
}

impl fmt::Debug for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MediaType({self})")
    }
}
