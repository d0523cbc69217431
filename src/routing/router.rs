//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes ordered by specificity
//! - Look up matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Specificity is computed from the pattern, never from declaration order
//! - Same-specificity overlaps are rejected when the table is built
//! - O(n) scan (acceptable for typical route counts)

use crate::routing::pattern::{Captures, PathPattern};
use crate::routing::template::UpstreamTemplate;
use crate::routing::RouteError;

/// A compiled route: inbound pattern plus the upstream it republishes.
#[derive(Debug, Clone)]
pub struct Route {
    /// Route identifier for logging/metrics.
    pub name: String,

    pub pattern: PathPattern,

    pub upstream: UpstreamTemplate,

    /// Human name used in "<resource> not found" bodies.
    pub resource: String,

    /// `error` text for transport failures on this route.
    pub failure_message: String,
}

impl Route {
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        upstream: &str,
        resource: impl Into<String>,
        failure_message: impl Into<String>,
    ) -> Result<Self, RouteError> {
        let pattern = PathPattern::parse(pattern)?;
        let upstream = UpstreamTemplate::parse(upstream, &pattern)?;
        Ok(Self {
            name: name.into(),
            pattern,
            upstream,
            resource: resource.into(),
            failure_message: failure_message.into(),
        })
    }
}

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub captures: Captures,
}

impl RouteMatch<'_> {
    /// Upstream URL for this match under `base`.
    pub fn upstream_url(&self, base: &str) -> String {
        self.route.upstream.url(base, &self.captures)
    }
}

/// Specificity-ordered, immutable route table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile a table. Routes are stably sorted by descending specificity,
    /// so registration order only matters between non-overlapping peers.
    pub fn new(mut routes: Vec<Route>) -> Result<Self, RouteError> {
        for (i, a) in routes.iter().enumerate() {
            for b in &routes[i + 1..] {
                if a.pattern.overlaps(&b.pattern) {
                    return Err(RouteError::Overlap {
                        first: a.pattern.to_string(),
                        second: b.pattern.to_string(),
                    });
                }
            }
        }

        routes.sort_by_key(|r| std::cmp::Reverse(r.pattern.specificity()));
        Ok(Self { routes })
    }

    /// The lesson content routes.
    pub fn lessons() -> Result<Self, RouteError> {
        Self::new(vec![
            Route::new(
                "quarterlies",
                "/quarterlies/{lang}",
                "/{lang}/quarterlies/index.json",
                "Quarterlies",
                "Failed to load home screen",
            )?,
            Route::new(
                "quarterly",
                "/quarterly/{lang}/{quarterlyId}",
                "/{lang}/quarterlies/{quarterlyId}/index.json",
                "Quarterly",
                "Proxy Error",
            )?,
            Route::new(
                "lesson",
                "/quarterly/{lang}/{quarterly}/{lesson}",
                "/{lang}/quarterlies/{quarterly}/lessons/{lesson}/index.json",
                "Lesson index",
                "Proxy failed",
            )?,
            Route::new(
                "day",
                "/quarterly/{lang}/{quarterly}/{lesson}/{day}",
                "/{lang}/quarterlies/{quarterly}/lessons/{lesson}/days/{day}/read/index.json",
                "Day content",
                "Proxy failed",
            )?,
        ])
    }

    /// Find the most specific route matching `path`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route
                .pattern
                .matches(path)
                .map(|captures| RouteMatch { route, captures })
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
