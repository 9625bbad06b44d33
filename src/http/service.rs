//! `tower::Service` adapters for routing trees.
//!
//! # Responsibilities
//! - Expose a built tree as a cloneable service that axum, hyper or any
//!   tower stack can mount
//! - Allow a whole tree to be replaced atomically on config reload
//!
//! # Design Decisions
//! - The node is chosen synchronously inside `call`; the returned future
//!   only drives the chosen handler
//! - Trees are swapped whole, never mutated; a request keeps the tree it
//!   started with

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::{BoxFuture, FutureExt};
use tower::Service;

use crate::routing::router::Router;

/// A frozen routing tree behind an `Arc`.
#[derive(Clone, Debug)]
pub struct RouterService {
    router: Arc<Router>,
}

impl RouterService {
    pub fn new(router: Router) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.router.serve(req).map(Ok::<_, Infallible>).boxed()
    }
}

/// A routing tree that can be replaced while serving.
#[derive(Clone)]
pub struct SharedRouter {
    current: Arc<ArcSwap<Router>>,
}

impl SharedRouter {
    pub fn new(router: Router) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(router)),
        }
    }

    /// Install `router` for all requests that start after this call.
    pub fn replace(&self, router: Router) {
        self.current.store(Arc::new(router));
        tracing::info!("Routing tree replaced");
    }

    /// The tree currently serving requests.
    pub fn load(&self) -> Arc<Router> {
        self.current.load_full()
    }
}

impl Service<Request<Body>> for SharedRouter {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.current.load().serve(req).map(Ok::<_, Infallible>).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RoutedRequest;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_router_service() {
        let mut router = Router::new();
        router
            .subrouter()
            .path("/ping")
            .unwrap()
            .handle(|_: &RoutedRequest, res: &mut Response<Body>| {
                *res.body_mut() = Body::from("pong");
            });

        let service = router.into_service();
        let res = service.clone().oneshot(get("/ping")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"pong");

        let res = service.oneshot(get("/nope")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_router_service_async_handler() {
        let mut router = Router::new();
        router
            .subrouter()
            .methods(["POST"])
            .handle_async(|mut req: RoutedRequest, mut res: Response<Body>| async move {
                let body = axum::body::to_bytes(req.take_body(), usize::MAX).await.unwrap();
                *res.body_mut() = Body::from(body);
                res
            });

        let post = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("echo me"))
            .unwrap();
        let res = router.into_service().oneshot(post).await.unwrap();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"echo me");
    }

    #[tokio::test]
    async fn test_shared_router_replace() {
        let shared = SharedRouter::new(Router::new());
        let res = shared.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);

        let mut next = Router::new();
        next.handle(|_: &RoutedRequest, res: &mut Response<Body>| {
            *res.status_mut() = StatusCode::NO_CONTENT;
        });
        shared.replace(next);

        let res = shared.oneshot(get("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
