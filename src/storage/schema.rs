//! Schema of the `nameservers` table.
//!
//! Every ingest replaces the whole dataset, so there is no migration history:
//! the table is dropped and created again, then indexed for the country and
//! reliability lookups done by the query service.

use log::{debug, info};
use sqlx::SqliteConnection;

use crate::error_handling::IngestError;

const DROP_TABLE: &str = "DROP TABLE IF EXISTS nameservers";

const CREATE_TABLE: &str = "CREATE TABLE nameservers (
    ip          TEXT PRIMARY KEY,
    name        TEXT NOT NULL DEFAULT '',
    country     TEXT NOT NULL DEFAULT '',
    city        TEXT NOT NULL DEFAULT '',
    version     TEXT NOT NULL DEFAULT '',
    error       TEXT NOT NULL DEFAULT '',
    dnssec      BOOLEAN NOT NULL DEFAULT 0,
    reliability REAL NOT NULL DEFAULT 0,
    checked_at  DATETIME NOT NULL,
    created_at  DATETIME NOT NULL
)";

/// Indexes built after every schema reset, as `(name, statement)`.
pub const NAMESERVER_INDEXES: [(&str, &str); 3] = [
    (
        "nameservers_country_index",
        "CREATE INDEX nameservers_country_index ON nameservers(country)",
    ),
    (
        "nameservers_country_reliability_index",
        "CREATE INDEX nameservers_country_reliability_index ON nameservers(country, reliability)",
    ),
    (
        "nameservers_reliability_index",
        "CREATE INDEX nameservers_reliability_index ON nameservers(reliability)",
    ),
];

/// Drops the `nameservers` table if it exists and creates it empty.
///
/// This discards every stored row. A missing table is not an error; any other
/// failure is returned as `IngestError::SchemaReset`. Runs on the caller's
/// connection so an ingest can keep it inside its transaction.
pub async fn reset_schema(conn: &mut SqliteConnection) -> Result<(), IngestError> {
    sqlx::query(DROP_TABLE)
        .execute(&mut *conn)
        .await
        .map_err(IngestError::SchemaReset)?;

    sqlx::query(CREATE_TABLE)
        .execute(&mut *conn)
        .await
        .map_err(IngestError::SchemaReset)?;

    info!("Recreated nameservers table");
    Ok(())
}

/// Builds the country, country/reliability and reliability indexes.
///
/// Must run right after [`reset_schema`] on the same connection.
pub async fn create_indexes(conn: &mut SqliteConnection) -> Result<(), IngestError> {
    for (index, statement) in NAMESERVER_INDEXES {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|source| IngestError::IndexCreation { index, source })?;
        debug!("Created index {index}");
    }
    Ok(())
}
