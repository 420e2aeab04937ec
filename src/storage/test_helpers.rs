//! Shared test helpers for storage and query tests.
//!
//! This module provides common utilities for database setup and test data creation
//! used across module tests.

#[cfg(test)]
use chrono::{TimeZone, Utc};
#[cfg(test)]
use sqlx::sqlite::SqlitePoolOptions;
#[cfg(test)]
use sqlx::SqlitePool;

#[cfg(test)]
use crate::models::Nameserver;

/// Creates an empty in-memory test database.
/// The pool holds a single connection so every statement sees the same database.
#[cfg(test)]
pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Builds a named, located nameserver checked at 2017-02-18 13:28:54 UTC.
#[cfg(test)]
pub fn nameserver(ip: &str, country: &str, reliability: f64) -> Nameserver {
    Nameserver {
        ip_address: ip.to_string(),
        name: format!("resolver-{}.example.", ip.replace('.', "-")),
        country: country.to_string(),
        city: "Testville".to_string(),
        version: String::new(),
        error: String::new(),
        dnssec: false,
        reliability,
        checked_at: Utc.with_ymd_and_hms(2017, 2, 18, 13, 28, 54).unwrap(),
        created_at: Utc.with_ymd_and_hms(2015, 1, 10, 0, 20, 37).unwrap(),
    }
}

/// Returns whether the nameservers table exists.
#[cfg(test)]
pub async fn table_exists(pool: &SqlitePool) -> bool {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='nameservers'",
    )
    .fetch_one(pool)
    .await
    .map(|count| count > 0)
    .unwrap_or(false)
}

/// Returns the names of the indexes defined on the nameservers table.
#[cfg(test)]
pub async fn index_names(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='nameservers' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .expect("Failed to list indexes")
}

/// Counts the rows of the nameservers table.
#[cfg(test)]
pub async fn count_rows(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM nameservers")
        .fetch_one(pool)
        .await
        .expect("Failed to count nameservers")
}
