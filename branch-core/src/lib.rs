//! Branch Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other workspace crates:
//! - Client configuration (credentials, API endpoint, logging)
//! - A single error type covering every stage of a link operation
//! - Structured logging with tracing
//! - Platform directory lookup
//! - API constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{BranchError, BranchResult};
pub use logging::init_logging;
pub use platform::Platform;
