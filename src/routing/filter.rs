//! Request filters.
//!
//! # Responsibilities
//! - Match request method against a set of tokens (case-sensitive)
//! - Match request scheme against a set of schemes (case-insensitive)
//! - Match the remaining path against a literal prefix
//! - Match the remaining path against a compiled template
//! - Combine present filters with AND semantics
//!
//! # Design Decisions
//! - Closed set of variants; at most one of each per node
//! - Absent variant = wildcard
//! - Fixed evaluation order: Methods, Schemes, PathPrefix, Path
//! - Path and PathPrefix exclude each other

use std::fmt;

use crate::http::request::RoutedRequest;
use crate::routing::error::RouteResult;
use crate::routing::pattern::PathPattern;
use crate::routing::set::Set;

/// Trait for matching requests against conditions.
pub trait Matcher {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &RoutedRequest) -> bool;
}

/// Identifies a filter variant; the declaration order is the evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKind {
    Methods,
    Schemes,
    PathPrefix,
    Path,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Methods => "methods",
            FilterKind::Schemes => "schemes",
            FilterKind::PathPrefix => "path_prefix",
            FilterKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// A single predicate over a request.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Accepted HTTP method tokens, e.g. `GET`.
    Methods(Set),
    /// Accepted schemes, stored lower-cased.
    Schemes(Set),
    /// Literal prefix of the remaining path.
    PathPrefix(String),
    /// Compiled path template.
    Path(PathPattern),
}

impl Filter {
    pub fn methods<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Methods(Set::new(methods))
    }

    pub fn schemes<I, S>(schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Schemes(
            schemes
                .into_iter()
                .map(|scheme| Into::<String>::into(scheme).to_ascii_lowercase())
                .collect(),
        )
    }

    pub fn path_prefix(prefix: impl Into<String>) -> Self {
        Filter::PathPrefix(prefix.into())
    }

    /// Compile `template` into a path filter.
    pub fn path(template: &str) -> RouteResult<Self> {
        PathPattern::compile(template).map(Filter::Path)
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Methods(_) => FilterKind::Methods,
            Filter::Schemes(_) => FilterKind::Schemes,
            Filter::PathPrefix(_) => FilterKind::PathPrefix,
            Filter::Path(_) => FilterKind::Path,
        }
    }
}

impl Matcher for Filter {
    fn matches(&self, req: &RoutedRequest) -> bool {
        match self {
            Filter::Methods(methods) => methods.contains(req.method().as_str()),
            Filter::Schemes(schemes) => schemes.contains(&req.scheme()),
            Filter::PathPrefix(prefix) => req.path().starts_with(prefix.as_str()),
            Filter::Path(pattern) => pattern.is_match(req.path()),
        }
    }
}

/// At most one filter per variant, combined with AND semantics.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    // Sorted by kind, unique per kind.
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `filter`, replacing any filter of the same variant.
    ///
    /// Setting a path filter drops the path prefix filter and the other way
    /// round.
    pub fn set(&mut self, filter: Filter) {
        let kind = filter.kind();
        let excluded = match kind {
            FilterKind::Path => Some(FilterKind::PathPrefix),
            FilterKind::PathPrefix => Some(FilterKind::Path),
            _ => None,
        };
        self.filters
            .retain(|existing| existing.kind() != kind && Some(existing.kind()) != excluded);

        let at = self
            .filters
            .iter()
            .position(|existing| existing.kind() > kind)
            .unwrap_or(self.filters.len());
        self.filters.insert(at, filter);
    }

    pub fn get(&self, kind: FilterKind) -> Option<&Filter> {
        self.filters.iter().find(|filter| filter.kind() == kind)
    }

    pub fn path(&self) -> Option<&PathPattern> {
        match self.get(FilterKind::Path) {
            Some(Filter::Path(pattern)) => Some(pattern),
            _ => None,
        }
    }

    pub fn path_prefix(&self) -> Option<&str> {
        match self.get(FilterKind::PathPrefix) {
            Some(Filter::PathPrefix(prefix)) => Some(prefix.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }
}

impl Matcher for FilterSet {
    fn matches(&self, req: &RoutedRequest) -> bool {
        for filter in &self.filters {
            if !filter.matches(req) {
                tracing::trace!(filter = %filter.kind(), path = %req.path(), "Filter rejected request");
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    fn request(method: &str, uri: &str) -> RoutedRequest {
        RoutedRequest::new(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
    }

    #[test]
    fn test_methods_filter() {
        let filter = Filter::methods(["GET", "DELETE"]);
        assert!(filter.matches(&request("GET", "/")));
        assert!(filter.matches(&request("DELETE", "/")));
        assert!(!filter.matches(&request("POST", "/")));
    }

    #[test]
    fn test_methods_filter_case_sensitive() {
        let filter = Filter::methods(["get"]);
        assert!(!filter.matches(&request("GET", "/")));
    }

    #[test]
    fn test_schemes_filter() {
        let filter = Filter::schemes(["HTTPS"]);
        assert!(filter.matches(&request("GET", "https://example.com/")));
        assert!(!filter.matches(&request("GET", "http://example.com/")));
        assert!(!filter.matches(&request("GET", "/")));
    }

    #[test]
    fn test_path_prefix_filter() {
        let filter = Filter::path_prefix("/api");
        assert!(filter.matches(&request("GET", "/api/v1")));
        assert!(!filter.matches(&request("GET", "/images")));
    }

    #[test]
    fn test_path_filter() {
        let filter = Filter::path("/song/{id:int}").unwrap();
        assert!(filter.matches(&request("GET", "/song/42")));
        assert!(!filter.matches(&request("GET", "/song/042")));
    }

    #[test]
    fn test_empty_set_matches_everything() {
        let set = FilterSet::new();
        assert!(set.matches(&request("PATCH", "/anything")));
    }

    #[test]
    fn test_set_and_semantics() {
        let mut set = FilterSet::new();
        set.set(Filter::methods(["GET"]));
        set.set(Filter::path("/lol").unwrap());

        assert!(set.matches(&request("GET", "/lol")));
        assert!(!set.matches(&request("POST", "/lol")));
        assert!(!set.matches(&request("GET", "/lmao")));
    }

    #[test]
    fn test_set_replaces_same_kind() {
        let mut set = FilterSet::new();
        set.set(Filter::methods(["GET"]));
        set.set(Filter::methods(["POST"]));

        assert_eq!(set.iter().count(), 1);
        assert!(set.matches(&request("POST", "/")));
        assert!(!set.matches(&request("GET", "/")));
    }

    #[test]
    fn test_path_and_prefix_are_exclusive() {
        let mut set = FilterSet::new();
        set.set(Filter::path("/a").unwrap());
        set.set(Filter::path_prefix("/b"));
        assert!(set.path().is_none());
        assert_eq!(set.path_prefix(), Some("/b"));

        set.set(Filter::path("/c").unwrap());
        assert!(set.path_prefix().is_none());
        assert_eq!(set.path().map(PathPattern::template), Some("/c"));
    }

    #[test]
    fn test_evaluation_order_is_fixed() {
        let mut set = FilterSet::new();
        set.set(Filter::path("/x").unwrap());
        set.set(Filter::schemes(["http"]));
        set.set(Filter::methods(["GET"]));

        let kinds: Vec<_> = set.iter().map(Filter::kind).collect();
        assert_eq!(kinds, [FilterKind::Methods, FilterKind::Schemes, FilterKind::Path]);
    }
}
