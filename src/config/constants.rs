//! Configuration constants.
//!
//! This module defines the constants used throughout the application: the
//! upstream feed location, database defaults and the reliability bounds used
//! for ranking.

/// Default location of the public-dns.info resolver list.
pub const DEFAULT_SOURCE_URL: &str = "https://public-dns.info/nameservers.csv";

/// Default local file the downloaded feed is staged into before decoding.
pub const DEFAULT_DOWNLOAD_PATH: &str = "./nameservers.temp.csv";

/// Default SQLite database path.
pub const DB_PATH: &str = "./public_dns.db";

/// Environment variable that overrides [`DB_PATH`].
pub const DB_PATH_ENV: &str = "PUBLIC_DNS_DB_PATH";

// Network operation timeouts
/// HTTP request timeout in seconds for downloading the feed.
/// The full list is a few megabytes.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// User-Agent sent when downloading the feed.
pub const DEFAULT_USER_AGENT: &str = concat!("public_dns/", env!("CARGO_PKG_VERSION"));

// Reliability bounds
/// Reliability of a resolver that has never failed a health check.
///
/// "Good" resolvers must sit exactly at this value, not merely be the
/// highest available for their country.
pub const MAX_RELIABILITY: f64 = 1.0;

/// Value substituted for an absent or unparsable reliability score.
pub const MIN_RELIABILITY: f64 = 0.0;
