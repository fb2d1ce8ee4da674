use std::path::{Path, PathBuf};
use std::sync::Arc;
use crossbeam::channel::Receiver;
use owo_colors::OwoColorize;
use warehouse::config::{self, WarehouseConfig};
use warehouse::contract::{COLUMN_AMOUNT, COLUMN_BRAND, COLUMN_NAME, COLUMN_PRICE};
use warehouse::editor::{DeleteOutcome, Editor, SaveOutcome};
use warehouse::output::{emit_success, OutputMode};
use warehouse::ui::{self, Icons};
use warehouse::{
    ContentValues, Item, ItemDbHelper, ItemProvider, ItemUri, ObserverRegistry, PriceTier,
};

/// Everything a command needs: the provider, an observer on the whole
/// table, and how to print
pub struct Context {
    provider: ItemProvider,
    changes: Receiver<ItemUri>,
    mode: OutputMode,
}

impl Context {
    pub fn open(
        config_path: Option<&Path>,
        database: Option<PathBuf>,
        mode: OutputMode,
    ) -> anyhow::Result<Self> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config::default_config_path);
        let config = WarehouseConfig::load(&config_path)?.unwrap_or_default();
        let db_path = database.unwrap_or_else(|| config.database_path());
        tracing::debug!("Using database {}", db_path.display());

        let registry = Arc::new(ObserverRegistry::new());
        let db = ItemDbHelper::new(db_path);
        let provider = ItemProvider::new(db, config.authority(), registry.clone());
        let changes = registry.register(provider.content_uri(), true);

        Ok(Self { provider, changes, mode })
    }

    /// Log every change notification delivered since the last call
    fn drain_changes(&self) {
        for uri in self.changes.try_iter() {
            tracing::debug!("Change notified for {}", uri);
        }
    }
}

/// Optional field values for `edit`
pub struct FieldEdits {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub amount: Option<String>,
}

impl FieldEdits {
    fn to_values(&self) -> anyhow::Result<ContentValues> {
        let mut values = ContentValues::new();
        if let Some(name) = &self.name {
            values.put(COLUMN_NAME, name.trim());
        }
        if let Some(brand) = &self.brand {
            values.put(COLUMN_BRAND, brand.trim());
        }
        if let Some(price) = &self.price {
            values.put(COLUMN_PRICE, price.parse::<PriceTier>()?.code());
        }
        if let Some(amount) = &self.amount {
            values.put(COLUMN_AMOUNT, amount.trim());
        }
        Ok(values)
    }
}

pub fn run_init(config_path: Option<&Path>, force: bool, mode: OutputMode) -> anyhow::Result<()> {
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(config::default_config_path);
    WarehouseConfig::with_defaults().save(&path, force)?;

    if mode.is_human() {
        ui::success(&format!("Wrote {}", path.display()));
    } else {
        emit_success(mode, "init", serde_json::json!({ "config": path }))?;
    }
    Ok(())
}

pub fn run_list(ctx: &Context, sort: Option<&str>) -> anyhow::Result<()> {
    let items = ctx.provider.list(sort)?;

    if ctx.mode.is_human() {
        if items.is_empty() {
            println!("{} No items in the catalog.", Icons::EMPTY);
        } else {
            println!("{}", ui::items_table(&items));
        }
    } else {
        emit_success(ctx.mode, "list", &items)?;
    }
    Ok(())
}

pub fn run_show(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let Some(item) = ctx.provider.get(id)? else {
        anyhow::bail!("No item with id {}", id);
    };

    if ctx.mode.is_human() {
        print_item(&ctx.provider.item_uri(id), &item);
    } else {
        emit_success(ctx.mode, "show", &item)?;
    }
    Ok(())
}

pub fn run_add(
    ctx: &Context,
    name: &str,
    brand: Option<&str>,
    price: &str,
    amount: Option<&str>,
) -> anyhow::Result<()> {
    let mut editor = Editor::new_item();
    editor.set_name(name);
    editor.set_brand(brand.unwrap_or_default());
    editor.set_price(price.parse()?);
    editor.set_amount(amount.unwrap_or_default());

    let outcome = editor.save(&ctx.provider)?;
    ctx.drain_changes();

    match outcome {
        SaveOutcome::Inserted(uri) => {
            if ctx.mode.is_human() {
                ui::item_new(&uri.to_string());
                ui::success("Item saved");
            } else {
                let data = serde_json::json!({ "uri": uri, "id": uri.parse_id() });
                emit_success(ctx.mode, "add", data)?;
            }
            Ok(())
        }
        SaveOutcome::Skipped => {
            if ctx.mode.is_human() {
                ui::warn("Nothing entered; item not saved");
            } else {
                emit_success(ctx.mode, "add", serde_json::json!({ "skipped": true }))?;
            }
            Ok(())
        }
        _ => anyhow::bail!("Error with saving item"),
    }
}

pub fn run_edit(ctx: &Context, id: i64, edits: FieldEdits) -> anyhow::Result<()> {
    let uri = ctx.provider.item_uri(id);
    let values = edits.to_values()?;
    if values.is_empty() {
        if ctx.mode.is_human() {
            ui::warn("No fields given; nothing to change");
        } else {
            emit_success(ctx.mode, "edit", serde_json::json!({ "updated": 0 }))?;
        }
        return Ok(());
    }

    let updated = ctx.provider.update(&uri, &values, None, &[])?;
    ctx.drain_changes();

    if updated == 0 {
        anyhow::bail!("Error with updating item {}", id);
    }
    if ctx.mode.is_human() {
        ui::item_updated(&uri.to_string());
        ui::success("Item updated");
    } else {
        emit_success(ctx.mode, "edit", serde_json::json!({ "uri": uri, "updated": updated }))?;
    }
    Ok(())
}

pub fn run_delete(ctx: &Context, id: i64, yes: bool) -> anyhow::Result<()> {
    let uri = ctx.provider.item_uri(id);
    if !confirm(ctx.mode, yes, &format!("Delete item {}?", id))? {
        ui::warn("Cancelled");
        return Ok(());
    }

    let mut editor = Editor::existing(uri.clone());
    let outcome = editor.delete(&ctx.provider)?;
    ctx.drain_changes();

    match outcome {
        DeleteOutcome::Deleted(n) => {
            if ctx.mode.is_human() {
                ui::item_deleted(&uri.to_string());
                ui::success("Item deleted");
            } else {
                emit_success(ctx.mode, "delete", serde_json::json!({ "uri": uri, "deleted": n }))?;
            }
            Ok(())
        }
        _ => anyhow::bail!("Error with deleting item {}", id),
    }
}

pub fn run_delete_all(ctx: &Context, yes: bool) -> anyhow::Result<()> {
    if !confirm(ctx.mode, yes, "Delete every item in the catalog?")? {
        ui::warn("Cancelled");
        return Ok(());
    }

    let deleted = ctx.provider.delete(&ctx.provider.content_uri(), None, &[])?;
    ctx.drain_changes();

    if ctx.mode.is_human() {
        ui::success(&format!("Deleted {} item(s)", deleted));
    } else {
        emit_success(ctx.mode, "delete-all", serde_json::json!({ "deleted": deleted }))?;
    }
    Ok(())
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let items = ctx.provider.list(None)?;
    let stats = CatalogStats::from_items(&items);

    if ctx.mode.is_human() {
        ui::header("Catalog statistics");
        let rows = [
            ("Items", stats.items.to_string()),
            ("Units in stock", stats.units.to_string()),
            ("Out of stock", stats.out_of_stock.to_string()),
            ("Low tier", stats.low.to_string()),
            ("Middle tier", stats.middle.to_string()),
            ("High tier", stats.high.to_string()),
        ];
        println!("{}", ui::stats_table(&rows));
    } else {
        emit_success(ctx.mode, "stats", &stats)?;
    }
    Ok(())
}

#[derive(Debug, Default, serde::Serialize)]
struct CatalogStats {
    items: usize,
    units: i64,
    out_of_stock: usize,
    low: usize,
    middle: usize,
    high: usize,
}

impl CatalogStats {
    fn from_items(items: &[Item]) -> Self {
        let mut stats = Self { items: items.len(), ..Self::default() };
        for item in items {
            stats.units += item.amount;
            if item.amount == 0 {
                stats.out_of_stock += 1;
            }
            match item.price {
                PriceTier::Low => stats.low += 1,
                PriceTier::Middle => stats.middle += 1,
                PriceTier::High => stats.high += 1,
            }
        }
        stats
    }
}

fn print_item(uri: &ItemUri, item: &Item) {
    ui::header(&item.name);
    ui::summary_row("URI:   ", &uri.to_string());
    ui::summary_row("Brand: ", item.brand.as_deref().unwrap_or("-"));
    let palette = ui::palette();
    let price = item.price.as_str().style(palette.tier(item.price)).to_string();
    ui::summary_row("Price: ", &price);
    let amount = item.amount.to_string().style(palette.stock(item.amount)).to_string();
    ui::summary_row("Amount:", &amount);
}

/// Ask before destroying data. JSON mode never prompts and requires `--yes`.
fn confirm(mode: OutputMode, yes: bool, question: &str) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !mode.is_human() {
        anyhow::bail!("refusing to delete without --yes in JSON mode");
    }

    let term = console::Term::stderr();
    term.write_str(&format!("{} {} [y/N] ", Icons::WARN, question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edits() -> FieldEdits {
        FieldEdits { name: None, brand: None, price: None, amount: None }
    }

    fn item(id: i64, price: PriceTier, amount: i64) -> Item {
        Item { id, name: format!("item {}", id), brand: None, price, amount }
    }

    #[test]
    fn test_edits_carry_only_given_fields() {
        let values = FieldEdits { amount: Some(" 3 ".into()), ..edits() }.to_values().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get_as_integer(COLUMN_AMOUNT), Some(3));
        assert!(!values.contains_key(COLUMN_PRICE));

        assert!(edits().to_values().unwrap().is_empty());
    }

    #[test]
    fn test_edits_parse_price_tier() {
        let values = FieldEdits {
            name: Some(" Router ".into()),
            price: Some("high".into()),
            ..edits()
        }
        .to_values()
        .unwrap();
        assert_eq!(values.get_as_text(COLUMN_NAME).as_deref(), Some("Router"));
        assert_eq!(values.get_as_integer(COLUMN_PRICE), Some(PriceTier::High.code()));

        assert!(FieldEdits { price: Some("free".into()), ..edits() }.to_values().is_err());
    }

    #[test]
    fn test_stats_from_items() {
        let items = [
            item(1, PriceTier::Low, 4),
            item(2, PriceTier::Middle, 0),
            item(3, PriceTier::High, 6),
            item(4, PriceTier::Low, 0),
        ];
        let stats = CatalogStats::from_items(&items);
        assert_eq!(stats.items, 4);
        assert_eq!(stats.units, 10);
        assert_eq!(stats.out_of_stock, 2);
        assert_eq!((stats.low, stats.middle, stats.high), (2, 1, 1));

        let empty = CatalogStats::from_items(&[]);
        assert_eq!(empty.items, 0);
        assert_eq!(empty.units, 0);
    }
}
