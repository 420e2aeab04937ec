//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (feed location, database path, HTTP timeout, reliability bounds)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Cli, Command, IngestSource, LogFormat, LogLevel};
