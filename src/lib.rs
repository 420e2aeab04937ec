//! public_dns library: the public-dns.info resolver list in SQLite
//!
//! This library downloads (or reads) the CSV list of public DNS resolvers
//! published by public-dns.info, replaces a SQLite table with it in a single
//! transaction, and answers "which resolver should I use for country X"
//! queries ranked by reliability.
//!
//! # Example
//!
//! ```no_run
//! use public_dns::{ingest_nameservers, load_from_file, PublicDns};
//! use sqlx::SqlitePool;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let servers = load_from_file("nameservers.csv")?;
//! let pool = SqlitePool::connect("sqlite:./public_dns.db").await?;
//! let persisted = ingest_nameservers(&pool, &servers).await?;
//! println!("Stored {persisted} resolvers");
//!
//! let dns = PublicDns::new(pool);
//! for server in dns.best_per_country(&["US", "DE", "PT"]).await? {
//!     println!("{} {}", server.country, server.ip_address);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The database and download functions are async and need a Tokio runtime.
//! Ingesting must finish before the stored list is queried.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod initialization;
mod loader;
mod models;
mod query;
mod storage;

// Re-export public API
pub use config::{Cli, Command, IngestSource, LogFormat, LogLevel};
pub use error_handling::{
    DatabaseError, FetchError, IngestError, IngestStage, LoadError, QueryError,
};
pub use loader::{decode, fetch_to_file, load_from_file, load_from_url};
pub use models::{CountryTally, Nameserver};
pub use query::PublicDns;
pub use run::{run_ingest, IngestReport};
pub use storage::{
    create_indexes, ingest_nameservers, ingest_nameservers_with, init_db_pool_with_path,
    reset_schema, ConflictPolicy, NAMESERVER_INDEXES,
};

// Load-then-ingest pipeline used by the `ingest` command
mod run {
    use std::path::Path;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::info;
    use sqlx::SqlitePool;

    use crate::config::IngestSource;
    use crate::loader::{load_from_file, load_from_url};
    use crate::storage::{ingest_nameservers_with, ConflictPolicy};

    /// Outcome of an ingest run.
    #[derive(Debug, Clone)]
    pub struct IngestReport {
        /// Number of records decoded from the source
        pub decoded: usize,
        /// Number of rows persisted in the database
        pub persisted: u64,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Loads the resolver list from `source` and replaces the database contents with it.
    ///
    /// URL sources are staged into `download_to` first.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be fetched or decoded, or if the
    /// ingest fails. Decoding failures leave the database untouched.
    pub async fn run_ingest(
        pool: &SqlitePool,
        client: &reqwest::Client,
        source: &IngestSource,
        download_to: &Path,
        policy: ConflictPolicy,
    ) -> Result<IngestReport> {
        let start = Instant::now();

        let servers = match source {
            IngestSource::File(path) => load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            IngestSource::Url(url) => load_from_url(client, url, download_to)
                .await
                .with_context(|| format!("Failed to load {url}"))?,
        };
        info!("Decoded {} nameservers", servers.len());

        let persisted = ingest_nameservers_with(pool, &servers, policy)
            .await
            .context("Failed to ingest nameservers")?;

        Ok(IngestReport {
            decoded: servers.len(),
            persisted,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }
}
