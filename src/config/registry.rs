//! Named handlers that route tables refer to.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};

use crate::http::request::RoutedRequest;
use crate::routing::handler::{AsyncHandler, Endpoint, Fail, Handler};

/// Largest body `echo_body` will buffer.
pub const ECHO_BODY_LIMIT: usize = 1024 * 1024;

/// Maps names used in a route table to handler values.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Endpoint>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in handlers:
    ///
    /// - `hello`: writes `Hello, World!`
    /// - `echo_vars`: writes the extracted path variables as JSON
    /// - `echo_body`: answers with the request body and content type
    /// - `not_found`: `404 Not Found`
    /// - `server_header`: middleware adding a `server: treemux` header
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("hello", hello);
        registry.register("echo_vars", echo_vars);
        registry.register_async("echo_body", echo_body);
        registry.register("not_found", Fail::new(StatusCode::NOT_FOUND, "Not Found"));
        registry.register("server_header", server_header);
        registry
    }

    /// Register `handler` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, handler: impl Handler) -> &mut Self {
        self.register_shared(name, Endpoint::Sync(Arc::new(handler)))
    }

    /// Register a handler that owns the request. It can serve as a route
    /// handler or fallback but not as middleware.
    pub fn register_async(&mut self, name: impl Into<String>, handler: impl AsyncHandler) -> &mut Self {
        self.register_shared(name, Endpoint::from_async(handler))
    }

    pub fn register_shared(&mut self, name: impl Into<String>, handler: Endpoint) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<Endpoint> {
        self.handlers.get(name).cloned()
    }

    /// Whether `name` is registered and runs synchronously.
    pub fn is_sync(&self, name: &str) -> bool {
        self.handlers.get(name).is_some_and(|handler| !handler.is_async())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}

fn hello(_req: &RoutedRequest, res: &mut Response<Body>) {
    *res.body_mut() = Body::from("Hello, World!");
}

fn echo_vars(req: &RoutedRequest, res: &mut Response<Body>) {
    let body = match req.vars() {
        Some(vars) => serde_json::to_string(vars),
        None => Ok("{}".to_string()),
    };
    match body {
        Ok(json) => {
            res.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            *res.body_mut() = Body::from(json);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode path variables");
            *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        }
    }
}

async fn echo_body(mut req: RoutedRequest, mut res: Response<Body>) -> Response<Body> {
    let content_type = req.headers().get(header::CONTENT_TYPE).cloned();
    match axum::body::to_bytes(req.take_body(), ECHO_BODY_LIMIT).await {
        Ok(bytes) => {
            if let Some(value) = content_type {
                res.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            *res.body_mut() = Body::from(bytes);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected request body");
            *res.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
        }
    }
    res
}

fn server_header(_req: &RoutedRequest, res: &mut Response<Body>) {
    res.headers_mut()
        .insert(header::SERVER, HeaderValue::from_static("treemux"));
}
