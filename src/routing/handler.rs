//! Request processors attached to routing nodes.
//!
//! Middleware runs while the tree is walked and only sees the request by
//! reference. The terminal step of a node (its handler or fallback) is an
//! [`Endpoint`], which receives the request by value once dispatch has
//! settled on that node, so it can consume the body and await.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Response, StatusCode};
use futures_util::future::{self, BoxFuture, FutureExt};

use crate::http::request::RoutedRequest;

/// Failure message written by the default fallback.
pub const DEFAULT_FAIL_MESSAGE: &str = "Handler node did not have a view assigned to it.";

/// Something that processes a routed request by writing into a response.
///
/// Used for middleware and for handlers that need neither the body nor
/// any I/O. Middleware is expected to only annotate the response (headers,
/// status) and leave the body to the terminal handler.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: &RoutedRequest, res: &mut Response<Body>);
}

impl<F> Handler for F
where
    F: Fn(&RoutedRequest, &mut Response<Body>) + Send + Sync + 'static,
{
    fn handle(&self, req: &RoutedRequest, res: &mut Response<Body>) {
        (self)(req, res)
    }
}

/// A handler that can be attached to several nodes at once.
pub type DynHandler = Arc<dyn Handler>;

/// A terminal handler that owns the request and may suspend.
///
/// `res` is the response as middleware left it; the returned response is
/// what the client receives.
pub trait AsyncHandler: Send + Sync + 'static {
    fn call(&self, req: RoutedRequest, res: Response<Body>) -> BoxFuture<'static, Response<Body>>;
}

impl<F, Fut> AsyncHandler for F
where
    F: Fn(RoutedRequest, Response<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response<Body>> + Send + 'static,
{
    fn call(&self, req: RoutedRequest, res: Response<Body>) -> BoxFuture<'static, Response<Body>> {
        (self)(req, res).boxed()
    }
}

/// The handler or fallback that answers once a node has been chosen.
#[derive(Clone)]
pub enum Endpoint {
    Sync(DynHandler),
    Async(Arc<dyn AsyncHandler>),
}

impl Endpoint {
    pub fn sync(handler: impl Handler) -> Self {
        Endpoint::Sync(Arc::new(handler))
    }

    pub fn from_async(handler: impl AsyncHandler) -> Self {
        Endpoint::Async(Arc::new(handler))
    }

    /// Produce the final response. Synchronous handlers have already run
    /// when this returns; the future is then immediately ready.
    pub fn call(&self, req: RoutedRequest, mut res: Response<Body>) -> BoxFuture<'static, Response<Body>> {
        match self {
            Endpoint::Sync(handler) => {
                handler.handle(&req, &mut res);
                future::ready(res).boxed()
            }
            Endpoint::Async(handler) => handler.call(req, res),
        }
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Endpoint::Async(_))
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Sync(_) => f.write_str("Endpoint::Sync"),
            Endpoint::Async(_) => f.write_str("Endpoint::Async"),
        }
    }
}

/// Responder that writes a fixed status and message.
///
/// The default instance answers `501 Not Implemented` with
/// [`DEFAULT_FAIL_MESSAGE`] and is every node's initial fallback.
#[derive(Debug, Clone)]
pub struct Fail {
    status: StatusCode,
    message: String,
}

impl Fail {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for Fail {
    fn default() -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, DEFAULT_FAIL_MESSAGE)
    }
}

impl Handler for Fail {
    fn handle(&self, _req: &RoutedRequest, res: &mut Response<Body>) {
        *res.status_mut() = self.status;
        *res.body_mut() = Body::from(self.message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn routed(method: &str, body: &'static str) -> RoutedRequest {
        RoutedRequest::new(
            Request::builder()
                .method(method)
                .uri("/")
                .body(Body::from(body))
                .unwrap(),
        )
    }

    #[test]
    fn test_default_fail() {
        let req = routed("GET", "");
        let mut res = Response::new(Body::empty());
        Fail::default().handle(&req, &mut res);
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_closure_handler() {
        let handler = |_: &RoutedRequest, res: &mut Response<Body>| {
            *res.status_mut() = StatusCode::ACCEPTED;
        };
        let req = routed("GET", "");
        let mut res = Response::new(Body::empty());
        handler.handle(&req, &mut res);
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_sync_endpoint() {
        let endpoint = Endpoint::sync(Fail::new(StatusCode::GONE, "gone"));
        assert!(!endpoint.is_async());

        let res = endpoint.call(routed("GET", ""), Response::new(Body::empty())).await;
        assert_eq!(res.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn test_async_endpoint_consumes_body() {
        let endpoint = Endpoint::from_async(|mut req: RoutedRequest, mut res: Response<Body>| async move {
            let bytes = axum::body::to_bytes(req.take_body(), usize::MAX).await.unwrap();
            *res.body_mut() = Body::from(bytes);
            res
        });
        assert!(endpoint.is_async());

        let res = endpoint
            .call(routed("POST", "payload"), Response::new(Body::empty()))
            .await;
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"payload");
    }
}
