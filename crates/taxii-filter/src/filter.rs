use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use taxii_types::{StixId, Timestamp};

use crate::cursor::Cursor;
use crate::error::{FilterError, FilterResult};

/// Query parameter: lower bound (strict) on `date_added`.
pub const ADDED_AFTER_QPARAM: &str = "added_after";
/// Query parameter: requested page size.
pub const LIMIT_QPARAM: &str = "limit";
/// Query parameter: pagination cursor echoed from a prior page.
pub const NEXT_QPARAM: &str = "next";
/// Query parameter: object id set.
pub const MATCH_ID_QPARAM: &str = "match[id]";
/// Query parameter: STIX type set.
pub const MATCH_TYPE_QPARAM: &str = "match[type]";
/// Query parameter: version selector set.
pub const MATCH_VERSION_QPARAM: &str = "match[version]";
/// Query parameter: STIX spec version set.
pub const MATCH_SPEC_VERSION_QPARAM: &str = "match[spec_version]";

/// Server-side page size policy.
///
/// `default_limit` applies when a request names no `limit`; requested limits
/// are clamped to `max_limit` rather than rejected; only non-positive or
/// unparseable limits are an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageLimits {
    /// Page size used when the request does not specify one.
    pub default_limit: usize,
    /// Hard upper bound on any page size.
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

impl PageLimits {
    /// The page size to use for a request that asked for `requested`.
    pub fn effective(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

/// Selection of versions within one object's version chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionSelect {
    /// The earliest version of each object.
    First,
    /// The latest version of each object.
    Last,
    /// The version with this exact stamp.
    Exact(Timestamp),
}

impl VersionSelect {
    /// Parse one `match[version]` token.
    pub fn parse(token: &str) -> FilterResult<Self> {
        match token {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => Timestamp::parse(other).map(Self::Exact).map_err(|_| {
                FilterError::InvalidVersionSelector {
                    value: other.to_string(),
                }
            }),
        }
    }

    /// Returns `true` if a version at `stamp` is selected, given the
    /// first and last stamps of the object's chain.
    pub fn selects(&self, stamp: Timestamp, first: Timestamp, last: Timestamp) -> bool {
        match self {
            Self::First => stamp == first,
            Self::Last => stamp == last,
            Self::Exact(exact) => stamp == *exact,
        }
    }
}

/// Parsed query constraints shared by the objects, manifest, and versions
/// endpoints.
///
/// `None` on a dimension means "unconstrained". The version dimension
/// defaults to [`VersionSelect::Last`] when absent: TAXII listings return
/// only the latest version of each object unless the request says otherwise.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Strict lower bound on `date_added`.
    pub added_after: Option<Timestamp>,
    /// Requested page size (validated positive, not yet clamped).
    pub limit: Option<usize>,
    /// Resumption cursor from a prior page.
    pub next: Option<Cursor>,
    /// Object id membership set.
    pub ids: Option<BTreeSet<StixId>>,
    /// STIX type membership set, matched against the id's type prefix.
    pub types: Option<BTreeSet<String>>,
    /// Version selectors; absent means latest-only.
    pub versions: Option<Vec<VersionSelect>>,
    /// STIX spec version membership set.
    pub spec_versions: Option<BTreeSet<String>>,
}

impl Filter {
    /// Parse a filter from a generic multimap of query keys to values.
    ///
    /// Values may repeat per key and each value may itself be a
    /// comma-separated set; both spellings accumulate into one set.
    /// Unrecognized keys are ignored.
    pub fn from_query(query: &HashMap<String, Vec<String>>) -> FilterResult<Self> {
        let mut filter = Filter::default();

        if let Some(value) = first_value(query, ADDED_AFTER_QPARAM) {
            let stamp =
                Timestamp::parse(value).map_err(|_| FilterError::InvalidAddedAfter {
                    value: value.to_string(),
                })?;
            filter.added_after = Some(stamp);
        }

        if let Some(value) = first_value(query, LIMIT_QPARAM) {
            let limit: i64 = value.parse().map_err(|_| FilterError::InvalidLimit {
                value: value.to_string(),
            })?;
            if limit <= 0 {
                return Err(FilterError::InvalidLimit {
                    value: value.to_string(),
                });
            }
            filter.limit = Some(limit as usize);
        }

        if let Some(value) = first_value(query, NEXT_QPARAM) {
            filter.next = Some(Cursor::decode(value)?);
        }

        if let Some(tokens) = set_values(query, MATCH_ID_QPARAM) {
            let ids = tokens
                .into_iter()
                .map(|t| {
                    StixId::new(t.clone()).map_err(|_| FilterError::InvalidIdValue { value: t })
                })
                .collect::<FilterResult<BTreeSet<_>>>()?;
            filter.ids = Some(ids);
        }

        if let Some(tokens) = set_values(query, MATCH_TYPE_QPARAM) {
            filter.types = Some(tokens.into_iter().collect());
        }

        if let Some(tokens) = set_values(query, MATCH_VERSION_QPARAM) {
            let selectors = tokens
                .iter()
                .map(|t| VersionSelect::parse(t))
                .collect::<FilterResult<Vec<_>>>()?;
            filter.versions = Some(selectors);
        }

        if let Some(tokens) = set_values(query, MATCH_SPEC_VERSION_QPARAM) {
            filter.spec_versions = Some(tokens.into_iter().collect());
        }

        Ok(filter)
    }

    /// Returns `true` if the object id passes the `match[id]` and
    /// `match[type]` dimensions.
    pub fn matches_id(&self, id: &StixId) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(id) {
                return false;
            }
        }
        if let Some(types) = &self.types {
            match id.object_type() {
                Some(t) => {
                    if !types.contains(t) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }

    /// Returns `true` if the record's spec version passes
    /// `match[spec_version]`.
    pub fn matches_spec_version(&self, spec_version: &str) -> bool {
        self.spec_versions
            .as_ref()
            .map(|set| set.contains(spec_version))
            .unwrap_or(true)
    }

    /// Returns `true` if `date_added` passes the `added_after` bound.
    pub fn matches_added_after(&self, date_added: Timestamp) -> bool {
        self.added_after
            .map(|bound| date_added > bound)
            .unwrap_or(true)
    }

    /// Returns `true` if a version at `stamp` is selected, given its
    /// chain's first and last stamps. Absent selectors mean latest-only.
    pub fn selects_version(&self, stamp: Timestamp, first: Timestamp, last: Timestamp) -> bool {
        match &self.versions {
            None => VersionSelect::Last.selects(stamp, first, last),
            Some(selectors) => selectors
                .iter()
                .any(|sel| sel.selects(stamp, first, last)),
        }
    }

    /// Returns `true` if every version of a matching object is requested
    /// (the get-object endpoint's unfiltered default).
    pub fn selects_all_versions(&self) -> bool {
        self.versions.is_none()
    }
}

fn first_value<'q>(query: &'q HashMap<String, Vec<String>>, key: &str) -> Option<&'q String> {
    query.get(key).and_then(|values| values.first())
}

fn set_values(query: &HashMap<String, Vec<String>>, key: &str) -> Option<Vec<String>> {
    let values = query.get(key)?;
    let tokens: Vec<String> = values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (k, v) in pairs {
            map.entry(k.to_string()).or_default().push(v.to_string());
        }
        map
    }

    #[test]
    fn empty_query_is_unconstrained() {
        let filter = Filter::from_query(&HashMap::new()).unwrap();
        assert!(filter.added_after.is_none());
        assert!(filter.limit.is_none());
        assert!(filter.matches_id(&StixId::new("indicator--a").unwrap()));
        assert!(filter.matches_spec_version("2.1"));
    }

    #[test]
    fn limit_must_be_positive() {
        for bad in ["0", "-5", "ten"] {
            let err = Filter::from_query(&query(&[(LIMIT_QPARAM, bad)])).unwrap_err();
            assert!(matches!(err, FilterError::InvalidLimit { .. }), "{bad}");
        }
        let filter = Filter::from_query(&query(&[(LIMIT_QPARAM, "25")])).unwrap();
        assert_eq!(filter.limit, Some(25));
    }

    #[test]
    fn added_after_must_be_a_timestamp() {
        let err =
            Filter::from_query(&query(&[(ADDED_AFTER_QPARAM, "not-a-date")])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidAddedAfter { .. }));
    }

    #[test]
    fn comma_separated_and_repeated_values_accumulate() {
        let filter = Filter::from_query(&query(&[
            (MATCH_TYPE_QPARAM, "indicator,malware"),
            (MATCH_TYPE_QPARAM, "relationship"),
        ]))
        .unwrap();
        let types = filter.types.unwrap();
        assert_eq!(types.len(), 3);
        assert!(types.contains("malware"));
        assert!(types.contains("relationship"));
    }

    #[test]
    fn type_filter_uses_id_prefix() {
        let filter = Filter::from_query(&query(&[(MATCH_TYPE_QPARAM, "indicator")])).unwrap();
        assert!(filter.matches_id(&StixId::new("indicator--a").unwrap()));
        assert!(!filter.matches_id(&StixId::new("malware--b").unwrap()));
        // An id without a type prefix can never match a type filter.
        assert!(!filter.matches_id(&StixId::new("untyped").unwrap()));
    }

    #[test]
    fn version_selectors_parse_tokens_and_stamps() {
        let filter = Filter::from_query(&query(&[(
            MATCH_VERSION_QPARAM,
            "first,last,2020-01-01T00:00:00Z",
        )]))
        .unwrap();
        let selectors = filter.versions.unwrap();
        assert_eq!(selectors.len(), 3);
        assert_eq!(selectors[0], VersionSelect::First);
        assert_eq!(selectors[1], VersionSelect::Last);

        let err = Filter::from_query(&query(&[(MATCH_VERSION_QPARAM, "latest")])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidVersionSelector { .. }));
    }

    #[test]
    fn default_version_selection_is_last() {
        let filter = Filter::default();
        let first = Timestamp::parse("2020-01-01T00:00:00Z").unwrap();
        let last = Timestamp::parse("2020-03-01T00:00:00Z").unwrap();
        assert!(filter.selects_version(last, first, last));
        assert!(!filter.selects_version(first, first, last));
    }

    #[test]
    fn added_after_bound_is_strict() {
        let bound = Timestamp::parse("2021-01-01T00:00:00Z").unwrap();
        let filter = Filter {
            added_after: Some(bound),
            ..Filter::default()
        };
        assert!(!filter.matches_added_after(bound));
        assert!(filter.matches_added_after(bound.next_nano()));
    }

    #[test]
    fn limits_clamp_and_default() {
        let limits = PageLimits::default();
        assert_eq!(limits.effective(None), 100);
        assert_eq!(limits.effective(Some(50)), 50);
        assert_eq!(limits.effective(Some(10_000)), 1000);
    }
}
