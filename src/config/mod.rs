//! Route table configuration.
//!
//! # Data Flow
//! ```text
//! route table file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → build.rs + HandlerRegistry → routing::Router
//!
//! On change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new tree swapped into SharedRouter
//! ```
//!
//! # Design Decisions
//! - Handlers are code, so the file names them and a registry resolves them
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod build;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use build::build_router;
pub use loader::{load_config, parse_config, ConfigError};
pub use registry::HandlerRegistry;
pub use schema::{FallbackConfig, ObservabilityConfig, RouteConfig, RouterConfig, ServerConfig};
