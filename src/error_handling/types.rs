//! Error type definitions.
//!
//! This module defines all error types used throughout the library, one enum
//! per stage of the pipeline: loading, fetching, ingesting and querying.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database setup.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Errors raised while downloading the resolver list.
///
/// Nothing here is retried: a failed or empty download is terminal for the call.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The source URL could not be parsed.
    #[error("Invalid source URL {url}: {source}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        #[source]
        source: url::ParseError,
    },

    /// The request failed before or while reading the body.
    #[error("Request to {url} failed: {source}")]
    Request {
        /// The requested URL
        url: String,
        /// Underlying client error
        #[source]
        source: ReqwestError,
    },

    /// The server answered with a non-success status.
    #[error("Request to {url} returned HTTP {status}")]
    Status {
        /// The requested URL
        url: String,
        /// Status returned by the server
        status: reqwest::StatusCode,
    },

    /// The server answered successfully but sent no bytes.
    #[error("No bytes written while downloading {url}")]
    EmptyBody {
        /// The requested URL
        url: String,
    },

    /// The local file the download is staged into could not be written.
    #[error("Failed to write download to {path}: {source}")]
    Sink {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while turning a CSV source into nameserver records.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file does not exist or cannot be opened.
    #[error("Cannot open {path}: {source}")]
    NotFound {
        /// The file that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The content does not have the expected shape (column count, timestamps, booleans).
    #[error("Malformed resolver list: {0}")]
    Decode(#[from] csv::Error),

    /// The remote source could not be staged locally.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Stage of an ingest at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum IngestStage {
    /// Dropping and recreating the table
    SchemaReset,
    /// Building the lookup indexes
    IndexCreation,
    /// Opening the transaction
    Begin,
    /// Preparing the insert statement
    Prepare,
    /// Inserting one record
    Insert,
    /// Committing the transaction
    Commit,
}

impl IngestStage {
    /// Human-readable name of the stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStage::SchemaReset => "table creation",
            IngestStage::IndexCreation => "index creation",
            IngestStage::Begin => "transaction begin",
            IngestStage::Prepare => "statement preparation",
            IngestStage::Insert => "row insertion",
            IngestStage::Commit => "transaction commit",
        }
    }
}

/// Errors raised by an ingest. Any of these means no rows were persisted.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Dropping or recreating the nameservers table failed.
    #[error("Failed to reset the nameservers table: {0}")]
    SchemaReset(#[source] sqlx::Error),

    /// One of the indexes could not be built.
    #[error("Failed to create index {index}: {source}")]
    IndexCreation {
        /// Name of the index
        index: &'static str,
        /// Underlying SQL error
        #[source]
        source: sqlx::Error,
    },

    /// The ingest transaction could not be opened.
    #[error("Failed to begin the ingest transaction: {0}")]
    Begin(#[source] sqlx::Error),

    /// The insert statement could not be prepared.
    #[error("Failed to prepare the insert statement: {0}")]
    Prepare(#[source] sqlx::Error),

    /// A row was rejected; the whole transaction was rolled back.
    #[error("Failed to insert nameserver {ip}: {source}")]
    Insert {
        /// IP address of the rejected record
        ip: String,
        /// Underlying SQL error
        #[source]
        source: sqlx::Error,
    },

    /// The transaction could not be committed and was rolled back.
    #[error("Failed to commit the ingest transaction: {0}")]
    Commit(#[source] sqlx::Error),
}

impl IngestError {
    /// Returns the stage of the ingest that failed.
    pub fn stage(&self) -> IngestStage {
        match self {
            IngestError::SchemaReset(_) => IngestStage::SchemaReset,
            IngestError::IndexCreation { .. } => IngestStage::IndexCreation,
            IngestError::Begin(_) => IngestStage::Begin,
            IngestError::Prepare(_) => IngestStage::Prepare,
            IngestError::Insert { .. } => IngestStage::Insert,
            IngestError::Commit(_) => IngestStage::Commit,
        }
    }
}

/// Errors raised by the read-only queries.
#[derive(Error, Debug)]
pub enum QueryError {
    /// No resolver matched the requested country.
    #[error("No nameserver found for country {country:?}")]
    NotFound {
        /// The requested country code
        country: String,
    },

    /// The query cannot be built from the given arguments.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}
