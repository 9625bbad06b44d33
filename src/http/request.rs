//! Request-scoped routing state.
//!
//! # Responsibilities
//! - Own the incoming request for the duration of one dispatch
//! - Track the remaining path after ancestors strip their prefixes
//! - Carry the path variables extracted on the way down the tree
//! - Report the effective scheme of the request
//!
//! # Design Decisions
//! - Nodes are shared across requests, so nothing per-request is ever
//!   written to a node; it all lives here
//! - The incoming request line is never rewritten; prefix stripping only
//!   shortens `path`
//! - The body is left in place for the terminal handler to take

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, Uri};

use crate::routing::vars::Vars;

/// Marker extension a host server inserts on requests that arrived over TLS.
///
/// It is consulted when the request URI carries no explicit scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsConnection;

/// A request travelling through the routing tree.
#[derive(Debug)]
pub struct RoutedRequest {
    request: Request<Body>,
    path: String,
    vars: Option<Vars>,
}

impl RoutedRequest {
    pub fn new(request: Request<Body>) -> Self {
        let path = request.uri().path().to_string();
        Self {
            request,
            path,
            vars: None,
        }
    }

    /// The request as received from the host server.
    pub fn request(&self) -> &Request<Body> {
        &self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Move the body out, leaving an empty one behind.
    ///
    /// Meant for the terminal handler; middleware sees the request by
    /// reference and cannot take it.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(self.request.body_mut())
    }

    /// The part of the path not yet consumed by a prefix filter.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lower-cased scheme: the URI scheme when present, otherwise inferred
    /// from the [`TlsConnection`] extension.
    pub fn scheme(&self) -> String {
        match self.request.uri().scheme_str() {
            Some(scheme) => scheme.to_ascii_lowercase(),
            None if self.request.extensions().get::<TlsConnection>().is_some() => {
                "https".to_string()
            }
            None => "http".to_string(),
        }
    }

    /// Variables extracted by the closest node on the matched path whose
    /// path filter declares placeholders, or `None` if there was none.
    pub fn vars(&self) -> Option<&Vars> {
        self.vars.as_ref()
    }

    /// Give the request back to the caller, dropping routing state.
    pub fn into_inner(self) -> Request<Body> {
        self.request
    }

    /// Remove `prefix` from the remaining path. An emptied path becomes `/`.
    pub(crate) fn strip_prefix(&mut self, prefix: &str) {
        if let Some(rest) = self.path.strip_prefix(prefix) {
            self.path = if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            };
        }
    }

    pub(crate) fn set_vars(&mut self, vars: Vars) {
        self.vars = Some(vars);
    }
}

impl From<Request<Body>> for RoutedRequest {
    fn from(request: Request<Body>) -> Self {
        Self::new(request)
    }
}
