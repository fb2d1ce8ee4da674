//! Query results
//!
//! A [`Cursor`] is a snapshot: rows are read out of SQLite when the query
//! runs, so later mutations never show through. It is consumed by iteration;
//! to see fresh data, query again.

use crate::uri::ItemUri;
use crate::values::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// One result row, addressed by column name or position
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.column_index(column).and_then(|i| self.values.get(i))
    }

    pub fn get_text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(Value::as_text)
    }

    pub fn get_integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }
}

/// Single-pass result sequence tagged with the identifier it was produced for
#[derive(Debug)]
pub struct Cursor {
    columns: Arc<[String]>,
    rows: VecDeque<Vec<Value>>,
    notification_uri: Option<ItemUri>,
}

impl Cursor {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.into(),
            rows: rows.into(),
            notification_uri: None,
        }
    }

    /// Record which identifier's changes should invalidate this result
    pub fn set_notification_uri(&mut self, uri: ItemUri) {
        self.notification_uri = Some(uri);
    }

    pub fn notification_uri(&self) -> Option<&ItemUri> {
        self.notification_uri.as_ref()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Rows not yet consumed
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.pop_front().map(|values| Row {
            columns: Arc::clone(&self.columns),
            values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl ExactSizeIterator for Cursor {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Cursor {
        Cursor::new(
            vec!["id".into(), "name".into()],
            vec![
                vec![Value::Integer(1), Value::from("Router")],
                vec![Value::Integer(2), Value::Null],
            ],
        )
    }

    #[test]
    fn test_single_pass() {
        let mut cursor = sample();
        assert_eq!(cursor.remaining(), 2);
        let first = cursor.next().unwrap();
        assert_eq!(first.get_integer("id"), Some(1));
        assert_eq!(first.get_text("name").as_deref(), Some("Router"));
        let second = cursor.next().unwrap();
        assert_eq!(second.get("name"), Some(&Value::Null));
        assert!(cursor.next().is_none());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_column_lookup() {
        let cursor = sample();
        assert_eq!(cursor.column_index("name"), Some(1));
        assert_eq!(cursor.column_index("brand"), None);
        assert_eq!(cursor.len(), 2);
        assert!(cursor.notification_uri().is_none());
    }
}
