//! # Warehouse - inventory catalog store
//!
//! Single-user inventory records (name, brand, price tier, stock amount)
//! kept in a local SQLite table.
//!
//! Warehouse provides:
//! - URI addressing of the whole table or a single row
//! - A provider that validates, executes and reports every read/write
//! - Change notification to registered observers after mutations
//! - A headless editor model for front ends

pub mod contract;
pub mod uri;
pub mod routes;
pub mod values;
pub mod cursor;
pub mod item;
pub mod storage;
pub mod notify;
pub mod provider;
pub mod editor;
pub mod config;
pub mod output;
pub mod ui;


// Re-exports for convenient access
pub use contract::PriceTier;
pub use cursor::{Cursor, Row};
pub use item::Item;
pub use notify::{ChangeSink, ObserverRegistry};
pub use provider::ItemProvider;
pub use routes::Route;
pub use storage::ItemDbHelper;
pub use uri::ItemUri;
pub use values::{ContentValues, Value};

/// Result type alias for Warehouse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Warehouse operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown URI: {0}")]
    UnknownUri(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Item requires a {0}")]
    MissingField(&'static str),

    #[error("Item requires valid {column}: {reason}")]
    InvalidValue { column: &'static str, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
