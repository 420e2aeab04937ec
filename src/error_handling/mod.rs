//! Error handling.
//!
//! This module provides the error types for every stage of the pipeline:
//! - Initialization (logger, HTTP client) and database setup
//! - Fetching and decoding the resolver list
//! - Ingesting it into SQLite, with the failing stage attached
//! - Querying the stored list

mod types;

// Re-export public API
pub use types::{
    DatabaseError, FetchError, IngestError, IngestStage, InitializationError, LoadError,
    QueryError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_ingest_stage_labels_are_distinct() {
        let labels: HashSet<&str> = IngestStage::iter().map(|s| s.as_str()).collect();
        assert_eq!(labels.len(), IngestStage::iter().count());
    }

    #[test]
    fn test_ingest_stage_label_names_failing_step() {
        let err = IngestError::IndexCreation {
            index: "nameservers_reliability_index",
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(err.stage().as_str(), "index creation");
        assert_eq!(IngestStage::Begin.as_str(), "transaction begin");
    }

    #[test]
    fn test_ingest_error_reports_stage() {
        let err = IngestError::SchemaReset(sqlx::Error::PoolClosed);
        assert_eq!(err.stage(), IngestStage::SchemaReset);

        let err = IngestError::IndexCreation {
            index: "nameservers_country_index",
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(err.stage(), IngestStage::IndexCreation);
        assert!(err.to_string().contains("nameservers_country_index"));

        let err = IngestError::Insert {
            ip: "8.8.8.8".to_string(),
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(err.stage(), IngestStage::Insert);
        assert!(err.to_string().contains("8.8.8.8"));

        assert_eq!(
            IngestError::Commit(sqlx::Error::PoolClosed).stage(),
            IngestStage::Commit
        );
    }

    #[test]
    fn test_query_not_found_message() {
        let err = QueryError::NotFound {
            country: "ZZ".to_string(),
        };
        assert_eq!(err.to_string(), "No nameserver found for country \"ZZ\"");
    }

    #[test]
    fn test_fetch_error_is_wrapped_by_load_error() {
        let err: LoadError = FetchError::EmptyBody {
            url: "http://127.0.0.1/ns.csv".to_string(),
        }
        .into();
        assert!(matches!(err, LoadError::Fetch(FetchError::EmptyBody { .. })));
        assert_eq!(
            err.to_string(),
            "No bytes written while downloading http://127.0.0.1/ns.csv"
        );
    }
}
