//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route registration (at startup):
//!     template → pattern.rs (regex + placeholder list)
//!     filters  → filter.rs (FilterSet, one per variant)
//!     nodes    → router.rs (tree of Router)
//!
//! Incoming request:
//!     router.rs (dispatch down the tree)
//!     → filter.rs (does this child want it?)
//!     → pattern.rs (extract typed variables)
//!     → handler.rs (middleware, then the chosen Endpoint)
//! ```
//!
//! # Design Decisions
//! - Trees are built before serving and immutable while serving
//! - Deterministic: same request always reaches the same node
//! - First match wins (registration order)

pub mod error;
pub mod filter;
pub mod handler;
pub mod pattern;
pub mod router;
pub mod set;
pub mod vars;

pub use error::{RouteError, RouteResult};
pub use filter::{Filter, FilterKind, FilterSet, Matcher};
pub use handler::{AsyncHandler, DynHandler, Endpoint, Fail, Handler, DEFAULT_FAIL_MESSAGE};
pub use pattern::PathPattern;
pub use router::Router;
pub use set::Set;
pub use vars::{Value, VarKind, Vars};
