//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, timeout and trace layers)
//!     → service.rs (SharedRouter as axum fallback service)
//!     → request.rs (RoutedRequest: request-scoped routing state)
//!     → routing::Router::dispatch
//!     → response written by handler or fallback
//! ```

pub mod request;
pub mod server;
pub mod service;

pub use request::{RoutedRequest, TlsConnection};
pub use server::HttpServer;
pub use service::{RouterService, SharedRouter};
