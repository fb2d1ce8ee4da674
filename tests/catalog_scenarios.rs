use std::sync::Arc;
use warehouse::contract::{self, PriceTier};
use warehouse::editor::{Editor, SaveOutcome};
use warehouse::notify::NullSink;
use warehouse::{
    ContentValues, Error, Item, ItemDbHelper, ItemProvider, ItemUri, ObserverRegistry, Value,
};

fn router() -> ContentValues {
    ContentValues::new()
        .with("name", "Router")
        .with("brand", "Acme")
        .with("price", 1)
        .with("amount", 5)
}

fn row_count(provider: &ItemProvider) -> usize {
    provider
        .query(&provider.content_uri(), &[], None, &[], None)
        .unwrap()
        .remaining()
}

#[test]
fn insert_query_update_delete_scenario() {
    let registry = Arc::new(ObserverRegistry::new());
    let provider = ItemProvider::in_memory(registry.clone());
    let changes = registry.register(provider.content_uri(), true);

    let uri = provider.insert(&provider.content_uri(), &router()).unwrap().unwrap();
    let id = uri.parse_id().unwrap();
    assert_eq!(changes.try_recv().unwrap(), provider.content_uri());

    let rows: Vec<Item> = provider
        .query(&uri, &[], None, &[], None)
        .unwrap()
        .map(|row| Item::from_row(&row).unwrap())
        .collect();
    assert_eq!(
        rows,
        vec![Item {
            id,
            name: "Router".into(),
            brand: Some("Acme".into()),
            price: PriceTier::High,
            amount: 5,
        }]
    );

    let changed = provider
        .update(&uri, &ContentValues::new().with("amount", 3), None, &[])
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(changes.try_recv().unwrap(), uri);

    let item = provider.get(id).unwrap().unwrap();
    assert_eq!(item.amount, 3);
    assert_eq!(item.name, "Router");
    assert_eq!(item.brand.as_deref(), Some("Acme"));
    assert_eq!(item.price, PriceTier::High);

    assert_eq!(provider.delete(&uri, None, &[]).unwrap(), 1);
    assert!(provider.query(&uri, &[], None, &[], None).unwrap().is_empty());
}

#[test]
fn null_name_creates_nothing() {
    let provider = ItemProvider::in_memory(Arc::new(NullSink));
    provider.insert(&provider.content_uri(), &router()).unwrap();
    let before = row_count(&provider);

    let mut values = router();
    values.put_null("name");
    let err = provider.insert(&provider.content_uri(), &values).unwrap_err();
    assert!(matches!(err, Error::MissingField("name")));
    assert_eq!(err.to_string(), "Item requires a name");
    assert_eq!(row_count(&provider), before);
}

#[test]
fn cursor_is_a_snapshot() {
    let provider = ItemProvider::in_memory(Arc::new(NullSink));
    provider.insert(&provider.content_uri(), &router()).unwrap();

    let cursor = provider.query(&provider.content_uri(), &[], None, &[], None).unwrap();
    provider.delete(&provider.content_uri(), None, &[]).unwrap();

    assert_eq!(cursor.remaining(), 1);
    assert_eq!(row_count(&provider), 0);
}

#[test]
fn single_row_identifier_ignores_caller_filter() {
    let provider = ItemProvider::in_memory(Arc::new(NullSink));
    let first = provider.insert(&provider.content_uri(), &router()).unwrap().unwrap();
    let second = provider
        .insert(&provider.content_uri(), &router().with("name", "Switch"))
        .unwrap()
        .unwrap();

    let deleted = provider
        .delete(&second, Some("id = ?"), &[Value::Integer(first.parse_id().unwrap())])
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining = provider.list(None).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(Some(remaining[0].id), first.parse_id());
}

#[test]
fn custom_authority_and_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = ItemDbHelper::new(dir.path().join(contract::DATABASE_NAME));
    let provider = ItemProvider::new(db, "shop.local", Arc::new(NullSink));

    let uri = provider.insert(&provider.content_uri(), &router()).unwrap().unwrap();
    assert_eq!(uri.to_string(), format!("content://shop.local/items/{}", uri.parse_id().unwrap()));

    let foreign = ItemUri::parse("content://com.elbrus.warehouse.catalog/items").unwrap();
    assert!(matches!(provider.query(&foreign, &[], None, &[], None), Err(Error::UnknownUri(_))));
}

#[test]
fn editor_full_flow_overwrites_every_field() {
    let provider = ItemProvider::in_memory(Arc::new(NullSink));
    let uri = provider.insert(&provider.content_uri(), &router()).unwrap().unwrap();

    let mut editor = Editor::existing(uri.clone());
    editor.load_from(&provider).unwrap();
    editor.set_amount("9");
    assert_eq!(editor.save(&provider).unwrap(), SaveOutcome::Updated(1));

    let item = provider.get(uri.parse_id().unwrap()).unwrap().unwrap();
    assert_eq!(item.amount, 9);
    assert_eq!(item.price, PriceTier::High);
}
