//! Lifecycle management.
//!
//! ```text
//! Startup (main.rs):
//!     Load route table → Validate → Build tree → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → server drains and exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
