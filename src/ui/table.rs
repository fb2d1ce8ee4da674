use crate::item::Item;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Brand")]
    brand: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Amount")]
    amount: i64,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            brand: item.brand.clone().unwrap_or_else(|| "-".to_string()),
            price: item.price.to_string(),
            amount: item.amount,
        }
    }
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Statistic")]
    label: String,
    #[tabled(rename = "Count")]
    count: String,
}

/// Two-column statistics table with counts right-aligned
pub fn stats_table(stats: &[(&str, String)]) -> String {
    if stats.is_empty() {
        return String::new();
    }
    let rows = stats.iter().map(|(label, count)| StatRow {
        label: label.to_string(),
        count: count.clone(),
    });
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()))
        .to_string()
}

/// Render items as a rounded table; empty input renders nothing
pub fn items_table(items: &[Item]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::right()))
        .with(Modify::new(Columns::single(4)).with(Alignment::right()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PriceTier;

    #[test]
    fn test_items_table() {
        let items = vec![Item {
            id: 1,
            name: "Router".into(),
            brand: None,
            price: PriceTier::High,
            amount: 5,
        }];
        let table = items_table(&items);
        assert!(table.contains("Router"));
        assert!(table.contains("high"));
        assert!(table.contains("Amount"));
        assert!(items_table(&[]).is_empty());
    }

    #[test]
    fn test_stats_table() {
        let table = stats_table(&[("Items", "3".to_string())]);
        assert!(table.contains("Statistic"));
        assert!(table.contains("Items"));
        assert!(stats_table(&[]).is_empty());
    }
}
