//! Item record - the single entity held in the catalog

use crate::contract::{COLUMN_AMOUNT, COLUMN_BRAND, COLUMN_ID, COLUMN_NAME, COLUMN_PRICE, PriceTier};
use crate::cursor::Row;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A copy of one catalog row. Holding an `Item` never keeps the row alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Store-assigned id
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub price: PriceTier,
    /// Units in stock
    pub amount: i64,
}

impl Item {
    /// Decode a row that carries every item column
    pub fn from_row(row: &Row) -> Result<Self> {
        let missing = |column: &'static str| Error::InvalidValue {
            column,
            reason: "missing from row".to_string(),
        };

        let price_code = row.get_integer(COLUMN_PRICE).ok_or_else(|| missing(COLUMN_PRICE))?;
        let price = PriceTier::from_code(price_code).ok_or_else(|| Error::InvalidValue {
            column: COLUMN_PRICE,
            reason: format!("unknown price code {}", price_code),
        })?;

        Ok(Self {
            id: row.get_integer(COLUMN_ID).ok_or_else(|| missing(COLUMN_ID))?,
            name: row.get_text(COLUMN_NAME).ok_or_else(|| missing(COLUMN_NAME))?,
            brand: row.get_text(COLUMN_BRAND),
            price,
            amount: row.get_integer(COLUMN_AMOUNT).ok_or_else(|| missing(COLUMN_AMOUNT))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::values::Value;

    fn row(values: Vec<Value>) -> Row {
        let columns = ["id", "name", "brand", "price", "amount"].map(String::from).to_vec();
        Cursor::new(columns, vec![values]).next().unwrap()
    }

    #[test]
    fn test_from_row() {
        let item = Item::from_row(&row(vec![
            Value::Integer(3),
            Value::from("Router"),
            Value::Null,
            Value::Integer(2),
            Value::Integer(8),
        ]))
        .unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.brand, None);
        assert_eq!(item.price, PriceTier::Middle);
        assert_eq!(item.amount, 8);
    }

    #[test]
    fn test_bad_price_code() {
        let err = Item::from_row(&row(vec![
            Value::Integer(3),
            Value::from("Router"),
            Value::Null,
            Value::Integer(7),
            Value::Integer(8),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { column: "price", .. }));
    }
}
