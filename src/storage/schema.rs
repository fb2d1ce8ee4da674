//! Database schema definitions

/// SQL to create the item table
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS catalog (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    brand TEXT,
    price INTEGER NOT NULL,
    amount INTEGER NOT NULL DEFAULT 0
)
"#;

/// Statements run when the database is created at the current version
pub fn create_statements() -> Vec<&'static str> {
    vec![CREATE_ITEMS_TABLE]
}

/// Statements moving the schema from `from` to `from + 1`.
///
/// Version 1 is the only version so far.
pub fn upgrade_statements(_from: i32) -> Vec<&'static str> {
    Vec::new()
}

/// Quote an identifier for direct use in SQL text.
///
/// Backticks, not double quotes: SQLite reads an unknown double-quoted name
/// as a string literal instead of failing.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
