//! Routing tree nodes and request dispatch.
//!
//! # Responsibilities
//! - Hold a node's filters, handler, fallback, middleware and children
//! - Walk a request down the tree to the node that answers it
//!
//! # Dispatch
//! ```text
//! Enter
//!     → strip own path prefix from the remaining path
//!     → extract variables if own path template has placeholders
//!     → run middleware in registration order
//!     → first child whose filters match? delegate to it
//!     → otherwise own handler, otherwise own fallback
//! ```
//!
//! # Design Decisions
//! - First match wins, in registration order; no specificity ranking
//! - No backtracking: a chosen child that finds nothing answers itself
//! - Dispatch borrows the tree immutably; per-request state lives in
//!   [`RoutedRequest`]
//! - Choosing the node never suspends; only the chosen [`Endpoint`] may

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;

use crate::http::request::RoutedRequest;
use crate::http::service::RouterService;
use crate::observability::metrics;
use crate::routing::error::RouteResult;
use crate::routing::filter::{Filter, FilterSet, Matcher};
use crate::routing::handler::{AsyncHandler, DynHandler, Endpoint, Fail, Handler};

/// A node of the routing tree.
pub struct Router {
    handler: Option<Endpoint>,
    fallback: Endpoint,
    middleware: Vec<DynHandler>,
    children: Vec<Router>,
    filters: FilterSet,
}

impl Router {
    /// Create a node with no filters and the default fallback.
    pub fn new() -> Self {
        Self {
            handler: None,
            fallback: Endpoint::sync(Fail::default()),
            middleware: Vec::new(),
            children: Vec::new(),
            filters: FilterSet::new(),
        }
    }

    /// Append a new child node and return it for configuration.
    pub fn subrouter(&mut self) -> &mut Router {
        self.children.push(Router::new());
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Install a filter, replacing one of the same variant.
    pub fn filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.set(filter);
        self
    }

    /// Accept only the given method tokens.
    pub fn methods<I, S>(&mut self, methods: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(Filter::methods(methods))
    }

    /// Accept only the given schemes (case-insensitive).
    pub fn schemes<I, S>(&mut self, schemes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(Filter::schemes(schemes))
    }

    /// Match the remaining path against `template`. Clears any path prefix.
    pub fn path(&mut self, template: &str) -> RouteResult<&mut Self> {
        let filter = Filter::path(template)?;
        Ok(self.filter(filter))
    }

    /// Match and strip a literal path prefix. Clears any path template.
    pub fn path_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.filter(Filter::path_prefix(prefix))
    }

    pub fn handle(&mut self, handler: impl Handler) -> &mut Self {
        self.handle_shared(Endpoint::sync(handler))
    }

    /// Install a handler that takes the request by value, e.g. to read
    /// its body.
    pub fn handle_async(&mut self, handler: impl AsyncHandler) -> &mut Self {
        self.handle_shared(Endpoint::from_async(handler))
    }

    pub fn handle_shared(&mut self, handler: Endpoint) -> &mut Self {
        self.handler = Some(handler);
        self
    }

    /// Replace the fallback used when neither a child nor a handler applies.
    pub fn fail(&mut self, fallback: impl Handler) -> &mut Self {
        self.fail_shared(Endpoint::sync(fallback))
    }

    pub fn fail_shared(&mut self, fallback: Endpoint) -> &mut Self {
        self.fallback = fallback;
        self
    }

    /// Append a middleware handler. Middleware runs on every request that
    /// reaches this node, before delegation or the handler.
    pub fn use_middleware(&mut self, middleware: impl Handler) -> &mut Self {
        self.use_shared(Arc::new(middleware))
    }

    pub fn use_shared(&mut self, middleware: DynHandler) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn children(&self) -> &[Router] {
        &self.children
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// The first child, in registration order, whose filters accept `req`.
    pub fn matching_child(&self, req: &RoutedRequest) -> Option<&Router> {
        self.children.iter().find(|child| child.filters.matches(req))
    }

    /// Route `req` through this node and its descendants.
    ///
    /// Middleware on the chosen path writes into `res`. Returns the handler
    /// or fallback of the node that answers; the caller runs it with
    /// [`Endpoint::call`].
    pub fn dispatch(&self, req: &mut RoutedRequest, res: &mut Response<Body>) -> &Endpoint {
        if let Some(prefix) = self.filters.path_prefix() {
            req.strip_prefix(prefix);
        }

        if let Some(pattern) = self.filters.path().filter(|pattern| pattern.has_vars()) {
            if let Some(vars) = pattern.extract(req.path()) {
                req.set_vars(vars);
            }
        }

        for middleware in &self.middleware {
            middleware.handle(req, res);
        }

        if let Some(child) = self.matching_child(req) {
            tracing::debug!(path = %req.path(), "Delegating to matching child");
            return child.dispatch(req, res);
        }

        match &self.handler {
            Some(handler) => {
                metrics::record_dispatch(metrics::Outcome::Handler);
                handler
            }
            None => {
                tracing::debug!(
                    method = %req.method(),
                    path = %req.path(),
                    "No route matched, using fallback"
                );
                metrics::record_dispatch(metrics::Outcome::Fallback);
                &self.fallback
            }
        }
    }

    /// Dispatch a fresh request and return the future of its response.
    ///
    /// The node is chosen before this returns; the future only drives the
    /// chosen handler.
    pub fn serve(&self, request: Request<Body>) -> BoxFuture<'static, Response<Body>> {
        let mut req = RoutedRequest::new(request);
        let mut res = Response::new(Body::empty());
        let endpoint = self.dispatch(&mut req, &mut res);
        endpoint.call(req, res)
    }

    /// Freeze the tree into a cloneable `tower::Service`.
    pub fn into_service(self) -> RouterService {
        RouterService::new(self)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("filters", &self.filters)
            .field("handler", &self.handler)
            .field("middleware", &self.middleware.len())
            .field("children", &self.children)
            .finish()
    }
}
