//! Route resolution - maps an [`ItemUri`] onto the table or onto one row
//!
//! Patterns are registered per authority as `/`-separated segments where
//! `#` matches a non-negative integer and `*` matches any single segment.

use crate::contract::PATH_ITEMS;
use crate::uri::ItemUri;
use crate::{Error, Result};

/// Resolved meaning of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The whole item table
    Collection,
    /// Exactly one row, by id
    Single(i64),
}

impl Route {
    pub fn is_single(&self) -> bool {
        matches!(self, Route::Single(_))
    }
}

/// What a registered pattern resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Collection,
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Number,
    Any,
}

impl Segment {
    fn parse(s: &str) -> Self {
        match s {
            "#" => Segment::Number,
            "*" => Segment::Any,
            other => Segment::Literal(other.to_string()),
        }
    }

    fn matches(&self, s: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == s,
            Segment::Number => !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()),
            Segment::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    authority: String,
    pattern: Vec<Segment>,
    kind: RouteKind,
}

/// Immutable routing table, built once and owned by the provider
#[derive(Debug, Clone, Default)]
pub struct UriMatcher {
    entries: Vec<Entry>,
}

impl UriMatcher {
    /// Create an empty matcher; nothing resolves until patterns are added
    pub fn new() -> Self {
        Self::default()
    }

    /// Routing table for the item table under `authority`:
    /// `items` → collection, `items/#` → single row
    pub fn for_items(authority: &str) -> Self {
        Self::new()
            .with_route(authority, PATH_ITEMS, RouteKind::Collection)
            .with_route(authority, &format!("{}/#", PATH_ITEMS), RouteKind::Single)
    }

    /// Register a pattern. A `Single` pattern takes its row id from the last
    /// `#` segment.
    pub fn with_route(mut self, authority: &str, path: &str, kind: RouteKind) -> Self {
        let pattern = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect();
        self.entries.push(Entry {
            authority: authority.to_string(),
            pattern,
            kind,
        });
        self
    }

    /// Match an identifier against the registered patterns, first match wins
    pub fn match_uri(&self, uri: &ItemUri) -> Option<Route> {
        self.entries.iter().find_map(|entry| {
            if entry.authority != uri.authority || entry.pattern.len() != uri.segments.len() {
                return None;
            }
            let all_match = entry
                .pattern
                .iter()
                .zip(&uri.segments)
                .all(|(p, s)| p.matches(s));
            if !all_match {
                return None;
            }
            match entry.kind {
                RouteKind::Collection => Some(Route::Collection),
                RouteKind::Single => {
                    let id = entry
                        .pattern
                        .iter()
                        .zip(&uri.segments)
                        .filter(|(p, _)| **p == Segment::Number)
                        .last()
                        .and_then(|(_, s)| s.parse::<i64>().ok())?;
                    Some(Route::Single(id))
                }
            }
        })
    }

    /// Resolve an identifier for `operation` or fail with [`Error::UnknownUri`]
    pub fn resolve(&self, uri: &ItemUri, operation: &str) -> Result<Route> {
        self.match_uri(uri)
            .ok_or_else(|| Error::UnknownUri(format!("{} is not supported for {}", operation, uri)))
    }
}
