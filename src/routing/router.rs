//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Resolve a path to exactly one handler plus params
//! - Fall back to the not-found handler when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - O(n) scan over routes (acceptable for typical route counts)
//! - Overlapping templates resolved by order only; a template that can never
//!   win is reported at startup but still registered

use crate::routing::matcher::{PathMatcher, RouteParams};
use crate::routing::template::{split_segments, RouteError, RouteTemplate};

/// A template paired with its matcher and handler.
#[derive(Debug)]
pub struct CompiledRoute<H> {
    template: RouteTemplate,
    matcher: PathMatcher,
    handler: H,
}

impl<H> CompiledRoute<H> {
    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// Placeholder names this route captures, in declaration order.
    pub fn param_names(&self) -> Vec<&str> {
        self.template.placeholders().collect()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Outcome of resolving a path.
#[derive(Debug)]
pub struct Resolved<'a, H> {
    pub handler: &'a H,
    pub params: RouteParams,
    /// Template that matched, `None` for the not-found fallback.
    pub template: Option<&'a str>,
}

/// Path router over handlers of type `H`.
#[derive(Debug)]
pub struct Router<H> {
    routes: Vec<CompiledRoute<H>>,
    not_found: H,
}

impl<H> Router<H> {
    /// Compile a route table. Order of `table` is the match order.
    pub fn register<I, S>(table: I, not_found: H) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = (S, H)>,
        S: AsRef<str>,
    {
        let mut routes: Vec<CompiledRoute<H>> = Vec::new();

        for (raw, handler) in table {
            let template = RouteTemplate::parse(raw.as_ref())?;
            let matcher = PathMatcher::compile(&template);

            if let Some(earlier) = routes.iter().find(|r| matcher.is_shadowed_by(&r.matcher)) {
                tracing::warn!(
                    template = %template,
                    shadowed_by = %earlier.template,
                    "Route can never match; an earlier template accepts every path it would"
                );
            }

            routes.push(CompiledRoute {
                template,
                matcher,
                handler,
            });
        }

        tracing::debug!(routes = routes.len(), "Route table compiled");
        Ok(Self { routes, not_found })
    }

    /// Resolve a request path. Never fails.
    pub fn resolve(&self, path: &str) -> Resolved<'_, H> {
        let words = split_segments(path);

        for route in &self.routes {
            if let Some(params) = route.matcher.matches(&words) {
                return Resolved {
                    handler: &route.handler,
                    params,
                    template: Some(route.template.as_str()),
                };
            }
        }

        Resolved {
            handler: &self.not_found,
            params: RouteParams::new(),
            template: None,
        }
    }

    pub fn routes(&self) -> &[CompiledRoute<H>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
