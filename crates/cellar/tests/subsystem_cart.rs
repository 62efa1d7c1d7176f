mod common;

use cellar::config::CART_STORAGE_KEY;
use cellar::{CartError, CartStore};
use cellar_catalog::{Catalog, CatalogItem, CatalogLookup, FlavorProfile, Price, Specs};
use cellar_storage::{FileStore, KeyValueStore, MemoryStore};
use common::{builtin_catalog, scratch_dir};
use std::fs;

fn store() -> CartStore<std::sync::Arc<Catalog>, MemoryStore> {
    CartStore::load(builtin_catalog(), MemoryStore::new())
}

#[test]
fn repeated_adds_accumulate() {
    let mut cart = store();
    for expected in 1..=4u32 {
        assert_eq!(cart.add_item("c1").unwrap(), expected);
    }
    assert_eq!(cart.cart().quantity("c1"), 4);
    assert_eq!(cart.cart().lines().len(), 1);
    assert_eq!(cart.item_count(), 4);
}

#[test]
fn set_quantity_zero_removes_line() {
    let mut cart = store();
    cart.add_item("c1").unwrap();
    assert_eq!(cart.set_quantity("c1", 0).unwrap(), 0);
    assert!(cart.cart().line("c1").is_none());

    cart.add_item("c2").unwrap();
    cart.set_quantity("c2", -3).unwrap();
    assert!(cart.cart().is_empty());
}

#[test]
fn set_quantity_is_absolute_and_creates_lines() {
    let mut cart = store();
    cart.add_item("c1").unwrap();
    cart.add_item("c1").unwrap();
    assert_eq!(cart.set_quantity("c1", 7).unwrap(), 7);
    assert_eq!(cart.set_quantity("c3", 2).unwrap(), 2);
    assert_eq!(cart.cart().quantity("c1"), 7);
    assert_eq!(cart.cart().quantity("c3"), 2);
}

#[test]
fn removing_absent_item_is_noop() {
    let mut cart = store();
    cart.add_item("c2").unwrap();
    assert!(cart.remove_item("c9").is_none());
    assert_eq!(cart.cart().quantity("c2"), 1);
}

#[test]
fn unknown_items_are_rejected_without_touching_lines() {
    let mut cart = store();
    cart.add_item("c1").unwrap();
    assert!(matches!(
        cart.add_item("nope"),
        Err(CartError::UnknownItem(id)) if id == "nope"
    ));
    assert!(matches!(
        cart.set_quantity("nope", 3),
        Err(CartError::UnknownItem(_))
    ));
    assert_eq!(cart.cart().lines().len(), 1);
}

#[test]
fn totals() {
    let mut cart = store();
    assert_eq!(cart.total(), Price::ZERO);
    cart.set_quantity("c1", 2).unwrap();
    assert_eq!(cart.total().to_string(), "900.00");
    cart.add_item("c2").unwrap();
    assert_eq!(cart.total(), Price::from_cents(90_000 + 120_000));
}

#[test]
fn unresolved_lines_contribute_nothing() {
    let raw = r#"[{"itemId":"ghost","quantity":3},{"itemId":"c1","quantity":1}]"#;
    let storage = MemoryStore::new().with_value(CART_STORAGE_KEY, raw);
    let cart = CartStore::load(builtin_catalog(), storage);
    assert_eq!(cart.cart().quantity("ghost"), 3);
    assert_eq!(cart.total().to_string(), "450.00");
}

#[test]
fn every_mutation_writes_through() {
    let mut cart = store();
    cart.add_item("c1").unwrap();
    cart.add_item("c2").unwrap();
    cart.set_quantity("c2", 5).unwrap();
    let persisted = cart.storage().get(CART_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(
        persisted,
        r#"[{"itemId":"c1","quantity":1},{"itemId":"c2","quantity":5}]"#
    );

    cart.clear();
    let persisted = cart.storage().get(CART_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(persisted, "[]");
}

#[test]
fn save_then_load_round_trips() {
    let mut cart = store();
    cart.add_item("c3").unwrap();
    cart.set_quantity("c1", 4).unwrap();
    cart.add_item("c3").unwrap();
    let before = cart.cart().clone();

    let reloaded = CartStore::load(builtin_catalog(), cart.into_storage());
    assert_eq!(reloaded.cart(), &before);
}

#[test]
fn empty_cart_round_trips() {
    let mut cart = store();
    cart.save().unwrap();
    let reloaded = CartStore::load(builtin_catalog(), cart.into_storage());
    assert!(reloaded.cart().is_empty());
}

#[test]
fn corrupted_storage_loads_empty() {
    for raw in ["not json at all", r#"{"itemId":"c1","quantity":2}"#, "42", "\"[]\""] {
        let storage = MemoryStore::new().with_value(CART_STORAGE_KEY, raw);
        let cart = CartStore::load(builtin_catalog(), storage);
        assert!(cart.cart().is_empty(), "payload {:?}", raw);
    }
}

#[test]
fn legacy_embedded_layout_is_accepted() {
    let raw = r#"[{"cereal":{"id":"c2","name":"Count's Estate: Chocolate","price":1200},"quantity":2}]"#;
    let storage = MemoryStore::new().with_value(CART_STORAGE_KEY, raw);
    let mut cart = CartStore::load(builtin_catalog(), storage);
    assert_eq!(cart.cart().quantity("c2"), 2);

    cart.add_item("c2").unwrap();
    let persisted = cart.storage().get(CART_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(persisted, r#"[{"itemId":"c2","quantity":3}]"#);
}

#[test]
fn failing_storage_keeps_memory_state() {
    let mut cart = CartStore::load(builtin_catalog(), MemoryStore::failing());
    assert!(cart.cart().is_empty());
    assert_eq!(cart.add_item("c1").unwrap(), 1);
    assert_eq!(cart.add_item("c1").unwrap(), 2);
    assert!(matches!(cart.save(), Err(CartError::Storage(_))));
    assert_eq!(cart.cart().quantity("c1"), 2);
}

#[test]
fn file_store_round_trip() {
    let root = scratch_dir("cart");
    {
        let mut cart = CartStore::load(builtin_catalog(), FileStore::new(&root));
        cart.add_item("c5").unwrap();
        cart.set_quantity("c6", 3).unwrap();
    }
    let raw = fs::read_to_string(root.join(CART_STORAGE_KEY)).unwrap();
    assert!(raw.contains(r#""itemId":"c5""#));

    let cart = CartStore::load(builtin_catalog(), FileStore::new(&root));
    assert_eq!(cart.cart().quantity("c5"), 1);
    assert_eq!(cart.cart().quantity("c6"), 3);
    let _ = fs::remove_dir_all(&root);
}

struct FixtureCatalog(Vec<CatalogItem>);

impl CatalogLookup for FixtureCatalog {
    fn lookup(&self, id: &str) -> Option<&CatalogItem> {
        self.0.iter().find(|item| item.id == id)
    }
}

#[test]
fn substitute_catalog_drives_totals() {
    let item = CatalogItem {
        id: "x".to_string(),
        name: "Fixture Flakes".to_string(),
        vintage: 2001,
        region: "Test Kitchen".to_string(),
        price: Price::from_cents(125),
        tasting_notes: Vec::new(),
        specs: Specs {
            decay_rate: 1,
            sugar_content: 1,
        },
        flavor: FlavorProfile {
            crunch: 50,
            sweetness: 50,
            nostalgia: 50,
            particulate: 50,
        },
        recommended_milk_pairing: None,
    };
    let mut cart = CartStore::load(FixtureCatalog(vec![item]), MemoryStore::new());
    cart.set_quantity("x", 3).unwrap();
    assert!(cart.add_item("c1").is_err());
    assert_eq!(cart.total().to_string(), "3.75");
}
