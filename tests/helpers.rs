// Shared test helpers for database setup and fixture access.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::PathBuf;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Creates an empty in-memory test database.
/// A single connection keeps every statement on the same in-memory database.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool")
}

/// Returns the path of a file in `tests/fixtures`.
#[allow(dead_code)] // Used by other test files
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Counts the rows of the nameservers table.
#[allow(dead_code)] // Used by other test files
pub async fn count_rows(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM nameservers")
        .fetch_one(pool)
        .await
        .expect("Failed to count nameservers")
}
