//! SQLite storage implementation

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use rusqlite::{Connection, params_from_iter};
use crate::{Result, Error};
use crate::contract::DATABASE_VERSION;
use crate::cursor::Cursor;
use crate::values::{ContentValues, Value};
use super::schema::{self, quote_ident};

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Owns the catalog database and opens it on first use.
///
/// Readable and writable handles are the same connection: there is a single
/// local client, so one handle serves both.
pub struct ItemDbHelper {
    location: Location,
    conn: OnceCell<Connection>,
}

impl ItemDbHelper {
    /// Helper for a database file (created on first use if missing)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: OnceCell::new(),
        }
    }

    /// Helper for an in-memory database (for testing)
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: OnceCell::new(),
        }
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Handle for reads
    pub fn readable(&self) -> Result<&Connection> {
        self.connection()
    }

    /// Handle for writes
    pub fn writable(&self) -> Result<&Connection> {
        self.connection()
    }

    fn connection(&self) -> Result<&Connection> {
        if let Some(conn) = self.conn.get() {
            return Ok(conn);
        }
        let conn = self.open()?;
        Ok(self.conn.get_or_init(|| conn))
    }

    fn open(&self) -> Result<Connection> {
        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                tracing::info!("Opening catalog database {}", path.display());
                Connection::open(path)?
            }
            Location::Memory => Connection::open_in_memory()?,
        };

        let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version == 0 {
            Self::on_create(&conn)?;
        } else if version < DATABASE_VERSION {
            Self::on_upgrade(&conn, version, DATABASE_VERSION)?;
        } else if version > DATABASE_VERSION {
            return Err(Error::Schema(format!(
                "database version {} is newer than supported version {}",
                version, DATABASE_VERSION
            )));
        }
        Ok(conn)
    }

    /// Called when the database has no schema yet
    fn on_create(conn: &Connection) -> Result<()> {
        tracing::info!("Creating catalog schema v{}", DATABASE_VERSION);
        let tx = conn.unchecked_transaction()?;
        for stmt in schema::create_statements() {
            tx.execute(stmt, [])?;
        }
        tx.pragma_update(None, "user_version", DATABASE_VERSION)?;
        tx.commit()?;
        Ok(())
    }

    /// Called when the stored schema is older than the current version
    fn on_upgrade(conn: &Connection, old_version: i32, new_version: i32) -> Result<()> {
        tracing::info!("Upgrading catalog schema v{} -> v{}", old_version, new_version);
        let tx = conn.unchecked_transaction()?;
        for from in old_version..new_version {
            for stmt in schema::upgrade_statements(from) {
                tx.execute(stmt, [])?;
            }
        }
        tx.pragma_update(None, "user_version", new_version)?;
        tx.commit()?;
        Ok(())
    }
}

// ========== Table Operations ==========
//
// Each function runs exactly one statement and returns the raw storage
// result; deciding what a failure means is left to the caller.

/// Select rows. An empty `columns` slice selects every column.
pub fn query(
    conn: &Connection,
    table: &str,
    columns: &[&str],
    selection: Option<&str>,
    args: &[Value],
    sort_order: Option<&str>,
) -> rusqlite::Result<Cursor> {
    let projection = if columns.is_empty() {
        "*".to_string()
    } else {
        columns.iter().map(|c| quote_ident(c)).collect::<Vec<_>>().join(", ")
    };

    let mut sql = format!("SELECT {} FROM {}", projection, quote_ident(table));
    if let Some(selection) = selection.filter(|s| !s.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(selection);
    }
    if let Some(sort_order) = sort_order.filter(|s| !s.trim().is_empty()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(sort_order);
    }
    tracing::debug!(%sql, args = args.len(), "query");

    let mut stmt = conn.prepare(&sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
    let width = names.len();

    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(row.get::<_, Value>(i)?);
        }
        out.push(values);
    }

    Ok(Cursor::new(names, out))
}

/// Insert one row and return its id
pub fn insert(conn: &Connection, table: &str, values: &ContentValues) -> rusqlite::Result<i64> {
    let sql = if values.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table))
    } else {
        let columns: Vec<String> = values.iter().map(|(c, _)| quote_ident(c)).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns.join(", "),
            placeholders
        )
    };
    tracing::debug!(%sql, "insert");

    conn.execute(&sql, params_from_iter(values.iter().map(|(_, v)| v)))?;
    Ok(conn.last_insert_rowid())
}

/// Update matching rows and return how many changed
pub fn update(
    conn: &Connection,
    table: &str,
    values: &ContentValues,
    selection: Option<&str>,
    args: &[Value],
) -> rusqlite::Result<usize> {
    let assignments: Vec<String> = values
        .iter()
        .map(|(c, _)| format!("{} = ?", quote_ident(c)))
        .collect();

    let mut sql = format!("UPDATE {} SET {}", quote_ident(table), assignments.join(", "));
    if let Some(selection) = selection.filter(|s| !s.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(selection);
    }
    tracing::debug!(%sql, args = args.len(), "update");

    let params = values.iter().map(|(_, v)| v).chain(args.iter());
    conn.execute(&sql, params_from_iter(params))
}

/// Delete matching rows (all rows when there is no selection)
pub fn delete(
    conn: &Connection,
    table: &str,
    selection: Option<&str>,
    args: &[Value],
) -> rusqlite::Result<usize> {
    let mut sql = format!("DELETE FROM {}", quote_ident(table));
    if let Some(selection) = selection.filter(|s| !s.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(selection);
    }
    tracing::debug!(%sql, args = args.len(), "delete");

    conn.execute(&sql, params_from_iter(args.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::TABLE_NAME;

    fn router() -> ContentValues {
        ContentValues::new()
            .with("name", "Router")
            .with("brand", "Acme")
            .with("price", 1)
            .with("amount", 5)
    }

    #[test]
    fn test_lazy_open() {
        let helper = ItemDbHelper::in_memory();
        assert!(!helper.is_open());
        let conn = helper.readable().unwrap();
        let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0)).unwrap();
        assert_eq!(version, DATABASE_VERSION);
        assert!(helper.is_open());
    }

    #[test]
    fn test_readable_and_writable_share_handle() {
        let helper = ItemDbHelper::in_memory();
        let w = helper.writable().unwrap();
        insert(w, TABLE_NAME, &router()).unwrap();
        let r = helper.readable().unwrap();
        let cursor = query(r, TABLE_NAME, &[], None, &[], None).unwrap();
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_table_crud() {
        let helper = ItemDbHelper::in_memory();
        let conn = helper.writable().unwrap();

        let id = insert(conn, TABLE_NAME, &router()).unwrap();
        assert!(id > 0);

        let changed = update(
            conn,
            TABLE_NAME,
            &ContentValues::new().with("amount", 3),
            Some("id = ?"),
            &[Value::Integer(id)],
        )
        .unwrap();
        assert_eq!(changed, 1);

        let mut cursor = query(conn, TABLE_NAME, &["name", "amount"], Some("id = ?"), &[Value::Integer(id)], None).unwrap();
        assert_eq!(cursor.column_names(), &["name".to_string(), "amount".to_string()]);
        let row = cursor.next().unwrap();
        assert_eq!(row.get_integer("amount"), Some(3));

        assert_eq!(delete(conn, TABLE_NAME, None, &[]).unwrap(), 1);
        assert!(query(conn, TABLE_NAME, &[], None, &[], None).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_projection_column_is_error() {
        let helper = ItemDbHelper::in_memory();
        let conn = helper.writable().unwrap();
        insert(conn, TABLE_NAME, &router()).unwrap();
        assert!(query(conn, TABLE_NAME, &["nmae"], None, &[], None).is_err());
    }

    #[test]
    fn test_amount_defaults_to_zero() {
        let helper = ItemDbHelper::in_memory();
        let conn = helper.writable().unwrap();
        let values = ContentValues::new().with("name", "Cable").with("price", 0);
        let id = insert(conn, TABLE_NAME, &values).unwrap();
        let mut cursor = query(conn, TABLE_NAME, &["amount"], Some("id = ?"), &[Value::Integer(id)], None).unwrap();
        assert_eq!(cursor.next().unwrap().get_integer("amount"), Some(0));
    }

    #[test]
    fn test_not_null_violation_is_error() {
        let helper = ItemDbHelper::in_memory();
        let conn = helper.writable().unwrap();
        let values = ContentValues::new().with("name", "NoPrice");
        assert!(insert(conn, TABLE_NAME, &values).is_err());
    }

    #[test]
    fn test_sort_order() {
        let helper = ItemDbHelper::in_memory();
        let conn = helper.writable().unwrap();
        for name in ["b", "c", "a"] {
            insert(conn, TABLE_NAME, &ContentValues::new().with("name", name).with("price", 0)).unwrap();
        }
        let names: Vec<String> = query(conn, TABLE_NAME, &["name"], None, &[], Some("name DESC"))
            .unwrap()
            .filter_map(|r| r.get_text("name"))
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("warehouse.db");

        {
            let helper = ItemDbHelper::new(&path);
            insert(helper.writable().unwrap(), TABLE_NAME, &router()).unwrap();
        }

        let helper = ItemDbHelper::new(&path);
        assert_eq!(helper.path(), Some(path.as_path()));
        let cursor = query(helper.readable().unwrap(), TABLE_NAME, &[], None, &[], None).unwrap();
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", DATABASE_VERSION + 1).unwrap();
        }
        let helper = ItemDbHelper::new(&path);
        assert!(matches!(helper.readable(), Err(Error::Schema(_))));
        assert!(!helper.is_open());
    }
}
