//! Item provider - the single gateway to the catalog table
//!
//! Every read and write goes through here:
//! 1. the identifier is resolved against the routing table,
//! 2. supplied values are validated (insert/update),
//! 3. exactly one storage statement runs,
//! 4. a change notification fires if any row was touched.
//!
//! Contract violations (unknown identifier, missing or invalid field) are
//! returned as errors before storage is touched. Storage failures on the
//! write path are logged and reported as `None` / `0`.

use std::sync::Arc;
use crate::contract::{
    self, COLUMN_AMOUNT, COLUMN_ID, COLUMN_NAME, COLUMN_PRICE, PriceTier, TABLE_NAME,
};
use crate::cursor::Cursor;
use crate::item::Item;
use crate::notify::ChangeSink;
use crate::routes::{Route, UriMatcher};
use crate::storage::{sqlite, ItemDbHelper};
use crate::uri::ItemUri;
use crate::values::{ContentValues, Value};
use crate::{Error, Result};

const ID_SELECTION: &str = "id = ?";

/// Filter applied to a statement after route resolution
struct Filter<'a> {
    selection: Option<&'a str>,
    args: Vec<Value>,
}

impl<'a> Filter<'a> {
    /// A single-row route always wins over the caller's filter
    fn for_route(route: Route, selection: Option<&'a str>, args: &[Value]) -> Self {
        match route {
            Route::Collection => Self { selection, args: args.to_vec() },
            Route::Single(id) => Self {
                selection: Some(ID_SELECTION),
                args: vec![Value::Integer(id)],
            },
        }
    }
}

pub struct ItemProvider {
    db: ItemDbHelper,
    matcher: UriMatcher,
    authority: String,
    sink: Arc<dyn ChangeSink>,
}

impl ItemProvider {
    /// Provider for the item table under `authority`
    pub fn new(db: ItemDbHelper, authority: &str, sink: Arc<dyn ChangeSink>) -> Self {
        Self::with_matcher(db, authority, UriMatcher::for_items(authority), sink)
    }

    /// Provider with an explicitly built routing table
    pub fn with_matcher(
        db: ItemDbHelper,
        authority: &str,
        matcher: UriMatcher,
        sink: Arc<dyn ChangeSink>,
    ) -> Self {
        Self {
            db,
            matcher,
            authority: authority.to_string(),
            sink,
        }
    }

    /// In-memory provider under the default authority (for testing)
    pub fn in_memory(sink: Arc<dyn ChangeSink>) -> Self {
        Self::new(ItemDbHelper::in_memory(), contract::CONTENT_AUTHORITY, sink)
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Identifier of the whole item table
    pub fn content_uri(&self) -> ItemUri {
        contract::items_uri(&self.authority)
    }

    /// Identifier of one row
    pub fn item_uri(&self, id: i64) -> ItemUri {
        self.content_uri().with_appended_id(id)
    }

    // ========== Reads ==========

    /// Run a read. `projection` empty means every column.
    ///
    /// For a single-row identifier the caller's `selection`/`args` are
    /// replaced by `id = <row id>`.
    pub fn query(
        &self,
        uri: &ItemUri,
        projection: &[&str],
        selection: Option<&str>,
        args: &[Value],
        sort_order: Option<&str>,
    ) -> Result<Cursor> {
        let route = self.resolve(uri, "query")?;
        let filter = Filter::for_route(route, selection, args);

        let conn = self.db.readable()?;
        let (selection, args) = (filter.selection, &filter.args);
        let mut cursor = sqlite::query(conn, TABLE_NAME, projection, selection, args, sort_order)?;
        cursor.set_notification_uri(uri.clone());
        Ok(cursor)
    }

    /// Content type for the identifier's route
    pub fn get_type(&self, uri: &ItemUri) -> Result<String> {
        match self.resolve(uri, "type")? {
            Route::Collection => Ok(contract::list_content_type(&self.authority)),
            Route::Single(_) => Ok(contract::item_content_type(&self.authority)),
        }
    }

    /// Fetch one item by id
    pub fn get(&self, id: i64) -> Result<Option<Item>> {
        let mut cursor = self.query(&self.item_uri(id), contract::ALL_COLUMNS, None, &[], None)?;
        cursor.next().map(|row| Item::from_row(&row)).transpose()
    }

    /// Every item, optionally sorted by one column
    pub fn list(&self, sort_order: Option<&str>) -> Result<Vec<Item>> {
        self.query(&self.content_uri(), contract::ALL_COLUMNS, None, &[], sort_order)?
            .map(|row| Item::from_row(&row))
            .collect()
    }

    // ========== Writes ==========

    /// Insert one item through the collection identifier.
    ///
    /// Returns the new row's identifier, or `None` if storage refused the row.
    pub fn insert(&self, uri: &ItemUri, values: &ContentValues) -> Result<Option<ItemUri>> {
        match self.resolve(uri, "insertion")? {
            Route::Collection => {}
            Route::Single(_) => {
                return Err(Error::UnknownUri(format!("insertion is not supported for {}", uri)));
            }
        }
        validate_insert(values)?;

        let id = match self.db.writable() {
            Ok(conn) => sqlite::insert(conn, TABLE_NAME, values).map_err(Error::from),
            Err(e) => Err(e),
        };
        let id = match id {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to insert row for {}: {}", uri, e);
                return Ok(None);
            }
        };

        self.sink.notify_change(uri);
        Ok(Some(uri.with_appended_id(id)))
    }

    /// Update the keys present in `values` on every matching row.
    ///
    /// Returns the number of rows changed; `0` when `values` is empty (no
    /// storage call) or when storage failed.
    pub fn update(
        &self,
        uri: &ItemUri,
        values: &ContentValues,
        selection: Option<&str>,
        args: &[Value],
    ) -> Result<usize> {
        let route = self.resolve(uri, "update")?;
        validate_update(values)?;

        if values.is_empty() {
            return Ok(0);
        }

        let filter = Filter::for_route(route, selection, args);
        let changed = match self.db.writable() {
            Ok(conn) => sqlite::update(conn, TABLE_NAME, values, filter.selection, &filter.args)
                .map_err(Error::from),
            Err(e) => Err(e),
        };
        let changed = changed.unwrap_or_else(|e| {
            tracing::error!("Failed to update rows for {}: {}", uri, e);
            0
        });

        if changed != 0 {
            self.sink.notify_change(uri);
        }
        Ok(changed)
    }

    /// Delete every matching row and return how many went
    pub fn delete(&self, uri: &ItemUri, selection: Option<&str>, args: &[Value]) -> Result<usize> {
        let route = self.resolve(uri, "deletion")?;
        let filter = Filter::for_route(route, selection, args);

        let deleted = match self.db.writable() {
            Ok(conn) => sqlite::delete(conn, TABLE_NAME, filter.selection, &filter.args)
                .map_err(Error::from),
            Err(e) => Err(e),
        };
        let deleted = deleted.unwrap_or_else(|e| {
            tracing::error!("Failed to delete rows for {}: {}", uri, e);
            0
        });

        if deleted != 0 {
            self.sink.notify_change(uri);
        }
        Ok(deleted)
    }

    fn resolve(&self, uri: &ItemUri, operation: &str) -> Result<Route> {
        let route = self.matcher.resolve(uri, operation)?;
        tracing::debug!(%uri, ?route, operation, "resolved");
        Ok(route)
    }
}

// ========== Validation ==========

/// Insert rules, checked in order: name, price, amount, then no caller id
fn validate_insert(values: &ContentValues) -> Result<()> {
    check_name(values)?;
    check_price(values)?;
    check_amount(values)?;
    check_no_id(values)
}

/// Update rules apply only to keys that are present
fn validate_update(values: &ContentValues) -> Result<()> {
    if values.contains_key(COLUMN_NAME) {
        check_name(values)?;
    }
    if values.contains_key(COLUMN_PRICE) {
        check_price(values)?;
    }
    if values.contains_key(COLUMN_AMOUNT) {
        check_amount(values)?;
    }
    check_no_id(values)
}

fn check_no_id(values: &ContentValues) -> Result<()> {
    if values.contains_key(COLUMN_ID) {
        return Err(Error::InvalidValue {
            column: COLUMN_ID,
            reason: "row id is assigned by the store".to_string(),
        });
    }
    Ok(())
}

/// Null or absent name is rejected; an empty string is a name
fn check_name(values: &ContentValues) -> Result<()> {
    match values.get(COLUMN_NAME) {
        None | Some(Value::Null) => Err(Error::MissingField(COLUMN_NAME)),
        Some(_) => Ok(()),
    }
}

fn check_price(values: &ContentValues) -> Result<()> {
    let code = values
        .get_as_integer(COLUMN_PRICE)
        .ok_or(Error::MissingField(COLUMN_PRICE))?;
    if PriceTier::from_code(code).is_none() {
        return Err(Error::InvalidValue {
            column: COLUMN_PRICE,
            reason: format!("{} is not a price tier", code),
        });
    }
    Ok(())
}

/// Absent or null amount is fine; anything else must be an integer >= 0
fn check_amount(values: &ContentValues) -> Result<()> {
    let value = match values.get(COLUMN_AMOUNT) {
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value,
    };
    match value.as_integer() {
        Some(amount) if amount >= 0 => Ok(()),
        Some(amount) => Err(Error::InvalidValue {
            column: COLUMN_AMOUNT,
            reason: format!("{} is negative", amount),
        }),
        None => Err(Error::InvalidValue {
            column: COLUMN_AMOUNT,
            reason: "not an integer".to_string(),
        }),
    }
}
