//! Item URI - address of the item table or of a single row
//!
//! Format: `<scheme>://<authority>/<segment>[/<segment>...]`
//!
//! Examples:
//! - `content://com.elbrus.warehouse.catalog/items`
//! - `content://com.elbrus.warehouse.catalog/items/42`

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque, structured identifier consumed by the provider.
///
/// Holds no knowledge of which shapes are meaningful; that decision belongs
/// to the routing table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemUri {
    /// Scheme, e.g. `content`
    pub scheme: String,
    /// Authority naming the store
    pub authority: String,
    /// Non-empty path segments
    pub segments: Vec<String>,
}

impl ItemUri {
    /// Create a new ItemUri
    pub fn new<I, S>(scheme: impl Into<String>, authority: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a URI string into an ItemUri
    ///
    /// Empty path segments are dropped, so `items/` and `items` are equal.
    pub fn parse(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri.split_once("://")
            .ok_or_else(|| Error::InvalidUri(format!("missing scheme separator in {}", uri)))?;

        if scheme.is_empty() {
            return Err(Error::InvalidUri(format!("empty scheme in {}", uri)));
        }

        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        if authority.is_empty() {
            return Err(Error::InvalidUri(format!("empty authority in {}", uri)));
        }

        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            segments,
        })
    }

    /// Append a row id as a new trailing segment
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut uri = self.clone();
        uri.segments.push(id.to_string());
        uri
    }

    /// Read the trailing segment as a row id
    pub fn parse_id(&self) -> Option<i64> {
        self.segments.last().and_then(|s| s.parse().ok())
    }

    /// True when `other` lives strictly below this URI
    pub fn is_ancestor_of(&self, other: &ItemUri) -> bool {
        self.scheme == other.scheme
            && self.authority == other.authority
            && self.segments.len() < other.segments.len()
            && other.segments.starts_with(&self.segments)
    }

    /// Convert to URI string
    pub fn to_uri_string(&self) -> String {
        let mut out = format!("{}://{}", self.scheme, self.authority);
        for segment in &self.segments {
            out.push('/');
            out.push_str(segment);
        }
        out
    }
}

impl fmt::Display for ItemUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for ItemUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ItemUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for ItemUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ItemUri::parse(&s).map_err(serde::de::Error::custom)
    }
}
