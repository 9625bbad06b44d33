//! Registration-time routing errors.
//!
//! These describe mistakes in the route table itself. They are returned
//! while the tree is being built and never produced while dispatching.

use thiserror::Error;

/// Errors raised while building a routing tree.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A segment opened a placeholder but did not follow `{name:type}`.
    #[error("malformed placeholder `{segment}` in path `{template}`")]
    MalformedPlaceholder { template: String, segment: String },

    /// The same variable name appears twice in one template.
    #[error("duplicate variable `{name}` in path `{template}`")]
    DuplicateVariable { template: String, name: String },

    /// The generated matching rule failed to compile.
    #[error("can't compile regex `{regex}` for path `{template}`: {source}")]
    InvalidRegex {
        template: String,
        regex: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for route registration.
pub type RouteResult<T> = Result<T, RouteError>;
