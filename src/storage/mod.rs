// storage/mod.rs
// Database operations module

pub mod ingest;
pub mod pool;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use ingest::{ingest_nameservers, ingest_nameservers_with, ConflictPolicy};
pub use pool::init_db_pool_with_path;
pub use schema::{create_indexes, reset_schema, NAMESERVER_INDEXES};
