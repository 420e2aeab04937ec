use chrono::{DateTime, Utc};
use serde::Serialize;

/// One public DNS resolver, as listed by public-dns.info and stored in the
/// `nameservers` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nameserver {
    /// IPv4 address of the resolver, unique across the table
    pub ip_address: String,
    /// Reverse-DNS hostname, empty when the address has none
    pub name: String,
    /// Two-letter ISO 3166-1 alpha-2 country code, possibly empty
    pub country: String,
    /// City the resolver is located in, possibly empty
    pub city: String,
    /// Software version reported by the resolver
    pub version: String,
    /// Last error observed by the health check, empty when healthy
    pub error: String,
    /// Whether the resolver supports DNSSEC
    pub dnssec: bool,
    /// Health score normalized to 0.0 - 1.0, higher is more reliable
    pub reliability: f64,
    /// When the resolver was last checked
    pub checked_at: DateTime<Utc>,
    /// When the resolver was added to the upstream list
    pub created_at: DateTime<Utc>,
}

/// Number of good resolvers in a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryTally {
    /// Two-letter country code
    pub country: String,
    /// Number of good resolvers in the country
    pub total: i64,
}
