//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with a single table:
//! - catalog(id, name, brand, price, amount)
//!
//! The helper owns the lazily opened connection; the table functions in
//! [`sqlite`] run one statement each and report raw storage results.

pub mod schema;
pub mod sqlite;

pub use sqlite::ItemDbHelper;
