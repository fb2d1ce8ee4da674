//! Catalog contract - names and value domains shared by every layer
//!
//! Identifiers take the form `content://<authority>/items[/<id>]`.
//!
//! Examples:
//! - `content://com.elbrus.warehouse.catalog/items`
//! - `content://com.elbrus.warehouse.catalog/items/7`

use crate::{Error, Result};
use crate::uri::ItemUri;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Scheme used by every catalog identifier
pub const SCHEME: &str = "content";

/// Default authority naming the catalog store
pub const CONTENT_AUTHORITY: &str = "com.elbrus.warehouse.catalog";

/// Path segment addressing the item table
pub const PATH_ITEMS: &str = "items";

/// Name of the database file
pub const DATABASE_NAME: &str = "warehouse.db";

/// Current schema version
pub const DATABASE_VERSION: i32 = 1;

/// Name of the item table
pub const TABLE_NAME: &str = "catalog";

pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BRAND: &str = "brand";
pub const COLUMN_PRICE: &str = "price";
pub const COLUMN_AMOUNT: &str = "amount";

/// Every column of the item table, in table order
pub const ALL_COLUMNS: &[&str] =
    &[COLUMN_ID, COLUMN_NAME, COLUMN_BRAND, COLUMN_PRICE, COLUMN_AMOUNT];

/// Base identifier of the item table under the given authority
pub fn items_uri(authority: &str) -> ItemUri {
    ItemUri::new(SCHEME, authority, [PATH_ITEMS])
}

/// Content type of a result holding any number of items
pub fn list_content_type(authority: &str) -> String {
    format!("vnd.cursor.dir/{}/{}", authority, PATH_ITEMS)
}

/// Content type of a result holding exactly one item
pub fn item_content_type(authority: &str) -> String {
    format!("vnd.cursor.item/{}/{}", authority, PATH_ITEMS)
}

/// Price bracket of an item.
///
/// Stored as an integer: `LOW=0`, `HIGH=1`, `MIDDLE=2`. The stored codes are
/// not ordered by price, so never compare them numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    #[default]
    Low,
    High,
    Middle,
}

impl PriceTier {
    /// Stored integer code
    pub fn code(&self) -> i64 {
        match self {
            PriceTier::Low => 0,
            PriceTier::High => 1,
            PriceTier::Middle => 2,
        }
    }

    /// Decode a stored integer code
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PriceTier::Low),
            1 => Some(PriceTier::High),
            2 => Some(PriceTier::Middle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Low => "low",
            PriceTier::High => "high",
            PriceTier::Middle => "middle",
        }
    }

    /// All tiers in selection order
    pub fn all() -> &'static [PriceTier] {
        &[PriceTier::Low, PriceTier::High, PriceTier::Middle]
    }
}

impl FromStr for PriceTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "0" => Ok(PriceTier::Low),
            "high" | "1" => Ok(PriceTier::High),
            "middle" | "mid" | "2" => Ok(PriceTier::Middle),
            _ => Err(Error::InvalidValue {
                column: COLUMN_PRICE,
                reason: format!("unknown price tier: {}", s),
            }),
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
