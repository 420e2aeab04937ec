//! Bulk ingest of the resolver list.
//!
//! An ingest is a full replace: inside one transaction the table is recreated
//! and indexed, then every record is inserted through one prepared statement.
//! The returned count is the sum of rows each execution actually affected.

use log::{debug, error, info, warn};
use sqlx::{Executor, SqlitePool, Statement};

use crate::error_handling::IngestError;
use crate::models::Nameserver;
use crate::storage::schema::{create_indexes, reset_schema};

/// What happens when a record repeats an IP address already inserted by the
/// same ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Reject the record and roll back the whole ingest.
    #[default]
    Abort,
    /// Skip the record; it does not count towards the persisted rows.
    Ignore,
}

impl ConflictPolicy {
    fn insert_statement(self) -> &'static str {
        match self {
            ConflictPolicy::Abort => {
                "INSERT INTO nameservers (ip, name, country, city, version, error, dnssec, reliability, checked_at, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            }
            ConflictPolicy::Ignore => {
                "INSERT OR IGNORE INTO nameservers (ip, name, country, city, version, error, dnssec, reliability, checked_at, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            }
        }
    }
}

/// Replaces the stored resolver list with `servers`.
///
/// A repeated IP address aborts the ingest and keeps the previous dataset. See [`ingest_nameservers_with`].
pub async fn ingest_nameservers(
    pool: &SqlitePool,
    servers: &[Nameserver],
) -> Result<u64, IngestError> {
    ingest_nameservers_with(pool, servers, ConflictPolicy::Abort).await
}

/// Replaces the stored resolver list with `servers` and returns the number of
/// rows persisted.
///
/// The schema reset, index creation and inserts all run in one transaction on
/// one connection. A failure at any stage rolls back to the previous dataset.
/// Under [`ConflictPolicy::Abort`] a successful result equals `servers.len()`;
/// under [`ConflictPolicy::Ignore`] it counts distinct IP addresses only.
///
/// # Errors
///
/// Any error means no rows were persisted. [`IngestError::stage`] tells which
/// step failed: begin, table creation, index creation, prepare, insert or
/// commit.
pub async fn ingest_nameservers_with(
    pool: &SqlitePool,
    servers: &[Nameserver],
    policy: ConflictPolicy,
) -> Result<u64, IngestError> {
    match replace_in_transaction(pool, servers, policy).await {
        Ok(total) => {
            let skipped = (servers.len() as u64).saturating_sub(total);
            if skipped > 0 {
                warn!("Skipped {skipped} nameservers with duplicate IP addresses");
            }
            info!("Ingested {total} nameservers");
            Ok(total)
        }
        Err(e) => {
            error!("Ingest failed during {}: {e}", e.stage().as_str());
            Err(e)
        }
    }
}

async fn replace_in_transaction(
    pool: &SqlitePool,
    servers: &[Nameserver],
    policy: ConflictPolicy,
) -> Result<u64, IngestError> {
    let mut tx = pool.begin().await.map_err(IngestError::Begin)?;

    // Dropping `tx` on an early return rolls the schema changes back.
    reset_schema(&mut tx).await?;
    create_indexes(&mut tx).await?;

    let statement = (&mut *tx)
        .prepare(policy.insert_statement())
        .await
        .map_err(IngestError::Prepare)?;

    debug!(
        "Inserting {} nameservers with conflict policy {:?}",
        servers.len(),
        policy
    );

    let mut total: u64 = 0;
    for server in servers {
        let result = statement
            .query()
            .bind(&server.ip_address)
            .bind(&server.name)
            .bind(&server.country)
            .bind(&server.city)
            .bind(&server.version)
            .bind(&server.error)
            .bind(server.dnssec)
            .bind(server.reliability)
            .bind(server.checked_at)
            .bind(server.created_at)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(done) => total += done.rows_affected(),
            Err(source) => {
                if let Err(e) = tx.rollback().await {
                    warn!("Rollback after failed insert also failed: {e}");
                }
                return Err(IngestError::Insert {
                    ip: server.ip_address.clone(),
                    source,
                });
            }
        }
    }

    // A transaction whose commit failed is rolled back when dropped.
    tx.commit().await.map_err(IngestError::Commit)?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::IngestStage;
    use crate::storage::pool::init_db_pool_with_path;
    use crate::storage::schema::NAMESERVER_INDEXES;
    use crate::storage::test_helpers::{count_rows, create_test_pool, index_names, nameserver};

    #[tokio::test]
    async fn test_ingest_counts_rows() {
        let pool = create_test_pool().await;
        let servers = vec![
            nameserver("8.8.8.8", "US", 1.0),
            nameserver("8.8.4.4", "US", 1.0),
            nameserver("194.150.168.168", "DE", 1.0),
        ];

        let total = ingest_nameservers(&pool, &servers)
            .await
            .expect("ingest should succeed");
        assert_eq!(total, 3);
        assert_eq!(count_rows(&pool).await, 3);
    }

    #[tokio::test]
    async fn test_ingest_empty_set() {
        let pool = create_test_pool().await;
        let total = ingest_nameservers(&pool, &[])
            .await
            .expect("empty ingest should succeed");
        assert_eq!(total, 0);
        assert_eq!(count_rows(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_ingest_builds_indexes() {
        let pool = create_test_pool().await;
        ingest_nameservers(&pool, &[nameserver("8.8.8.8", "US", 1.0)])
            .await
            .expect("ingest should succeed");

        let names = index_names(&pool).await;
        assert!(names.contains(&"nameservers_country_index".to_string()));
        assert!(names.contains(&"nameservers_country_reliability_index".to_string()));
        assert!(names.contains(&"nameservers_reliability_index".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_ip_aborts_ingest() {
        let pool = create_test_pool().await;
        ingest_nameservers(&pool, &[nameserver("9.9.9.9", "CH", 1.0)])
            .await
            .expect("first ingest should succeed");

        let servers = vec![
            nameserver("8.8.8.8", "US", 1.0),
            nameserver("8.8.8.8", "US", 0.5),
        ];
        let err = ingest_nameservers(&pool, &servers)
            .await
            .expect_err("duplicate IP must abort");

        assert_eq!(err.stage(), IngestStage::Insert);
        assert!(matches!(err, IngestError::Insert { ref ip, .. } if ip == "8.8.8.8"));
        // The failed batch left nothing behind and the previous dataset survives.
        assert_eq!(count_rows(&pool).await, 1);
        let ip: String = sqlx::query_scalar("SELECT ip FROM nameservers")
            .fetch_one(&pool)
            .await
            .expect("Failed to read surviving row");
        assert_eq!(ip, "9.9.9.9");
    }

    #[tokio::test]
    async fn test_duplicate_ip_ignored_is_not_counted() {
        let pool = create_test_pool().await;
        let servers = vec![
            nameserver("8.8.8.8", "US", 1.0),
            nameserver("8.8.8.8", "US", 0.5),
            nameserver("8.8.4.4", "US", 1.0),
        ];

        let total = ingest_nameservers_with(&pool, &servers, ConflictPolicy::Ignore)
            .await
            .expect("ignore policy should succeed");
        assert_eq!(total, 2);
        assert_eq!(count_rows(&pool).await, 2);

        let reliability: f64 =
            sqlx::query_scalar("SELECT reliability FROM nameservers WHERE ip = '8.8.8.8'")
                .fetch_one(&pool)
                .await
                .expect("Failed to read reliability");
        assert_eq!(reliability, 1.0);
    }

    #[tokio::test]
    async fn test_ingest_on_closed_pool() {
        let pool = create_test_pool().await;
        pool.close().await;

        let err = ingest_nameservers(&pool, &[nameserver("8.8.8.8", "US", 1.0)])
            .await
            .expect_err("pool is closed");
        assert_eq!(err.stage(), IngestStage::Begin);
    }

    #[tokio::test]
    async fn test_reingest_on_pool_with_several_connections() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let pool = init_db_pool_with_path(&dir.path().join("nameservers.db"))
            .await
            .expect("Pool should initialize");

        ingest_nameservers(&pool, &[nameserver("8.8.8.8", "US", 1.0)])
            .await
            .expect("first ingest should succeed");
        // Hold one connection while reading on another so the pool opens a second one.
        let held = pool.acquire().await.expect("Failed to acquire connection");
        assert_eq!(count_rows(&pool).await, 1);
        drop(held);

        let total = ingest_nameservers(&pool, &[nameserver("9.9.9.9", "CH", 1.0)])
            .await
            .expect("second ingest should succeed");
        assert_eq!(total, 1);
        assert_eq!(count_rows(&pool).await, 1);
        assert_eq!(index_names(&pool).await.len(), NAMESERVER_INDEXES.len());
    }

    #[tokio::test]
    async fn test_native_column_types() {
        let pool = create_test_pool().await;
        let mut server = nameserver("8.8.8.8", "US", 0.75);
        server.dnssec = true;
        ingest_nameservers(&pool, &[server])
            .await
            .expect("ingest should succeed");

        let (dnssec_type, reliability_type): (String, String) = sqlx::query_as(
            "SELECT typeof(dnssec), typeof(reliability) FROM nameservers WHERE ip = '8.8.8.8'",
        )
        .fetch_one(&pool)
        .await
        .expect("Failed to read column types");
        assert_eq!(dnssec_type, "integer");
        assert_eq!(reliability_type, "real");
    }
}
