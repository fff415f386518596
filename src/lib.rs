//! # Shelterdash - Animal Shelter Outcomes Dashboard
//!
//! Data platform for the AAC shelter outcomes dataset.
//!
//! Shelterdash provides:
//! - A SQLite-backed record store with dynamic, parameterized CRUD over the
//!   `animals` table
//! - A bulk CSV loader that provisions the schema and ingests the outcomes
//!   dataset
//! - A web dashboard serving the records as a table, geo markers, and a
//!   breed distribution
//! - A connectivity check for the backing database

pub mod config;
pub mod loader;
pub mod record;
pub mod server;
pub mod store;
pub mod ui;

// Re-exports for convenient access
pub use record::{FieldMap, Record, Value};
pub use store::AnimalStore;

/// Result type alias for Shelterdash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Shelterdash operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required column: {0}")]
    MissingColumn(String),
}
