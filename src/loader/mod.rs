//! Loading the resolver list.
//!
//! This module provides:
//! - CSV decoding into [`Nameserver`](crate::models::Nameserver) records
//! - Staging a remote list into a local file before decoding it

mod decode;
mod fetch;

// Re-export public API
pub use decode::{decode, load_from_file};
pub use fetch::{fetch_to_file, load_from_url};
