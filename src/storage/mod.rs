//! Storage layer for the daily projection history
//!
//! A thin abstraction over SQLite, organized into:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Snapshot merge and history reads
//! - `artifacts`: Versioned calibration outputs

pub mod artifacts;
pub mod models;
pub mod queries;
pub mod schema;


// Re-export the main types and the store for easy access
pub use models::*;
pub use queries::resolve_duplicates;
pub use schema::HistoryStore;
