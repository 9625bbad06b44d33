//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{Request, Response};
use treemux::RoutedRequest;

/// Build a request with an empty body.
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Handler that writes `body`.
#[allow(dead_code)]
pub fn reply(body: &'static str) -> impl Fn(&RoutedRequest, &mut Response<Body>) + Send + Sync + 'static {
    move |_: &RoutedRequest, res: &mut Response<Body>| {
        *res.body_mut() = Body::from(body);
    }
}

/// Collect a response body into a string.
pub async fn body_string(res: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
