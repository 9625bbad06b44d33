//! Tree-structured HTTP request router.
//!
//! A request enters at the root [`Router`] node. Each node strips the path
//! prefix it owns, extracts typed path variables declared by its own path
//! template, runs its middleware, and hands the request to the first child
//! whose filters accept it. When no child does, the node's handler answers,
//! or its fallback if it has none.
//!
//! ```text
//! root
//! ├── path_prefix("/api")
//! │   └── methods(GET) + path("/song/{id:int}")  → handler
//! └── path("/r/{article:str}/{id:nat}")         → handler
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{HandlerRegistry, RouterConfig};
pub use http::{HttpServer, RoutedRequest, RouterService, SharedRouter, TlsConnection};
pub use lifecycle::Shutdown;
pub use routing::{
    AsyncHandler, Endpoint, Fail, Filter, FilterSet, Handler, PathPattern, RouteError, Router, Value,
    Vars,
};
