//! Cart continuity across reloads from disk.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use boutique_core::{Price, ProductId};
use boutique_storefront::catalog::Catalog;
use boutique_storefront::storage::{FileStorage, StorageSlot, keys};
use boutique_storefront::store::CartStore;

fn setup() -> (tempfile::TempDir, Arc<dyn StorageSlot>, Catalog) {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn StorageSlot> = Arc::new(FileStorage::new(dir.path()));
    (dir, storage, Catalog::embedded().unwrap())
}

#[test]
fn test_documented_scenario_survives_reloads() {
    let (_dir, storage, catalog) = setup();
    let heels = catalog.find(&ProductId::new("7")).unwrap();

    {
        let mut cart = CartStore::new(Arc::clone(&storage));
        cart.add_item(Arc::clone(&heels), 1, Some("38"), Some("Black"));
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.total_price(), Price::new(679_000));
    }

    {
        let mut cart = CartStore::new(Arc::clone(&storage));
        assert_eq!(cart.total_items(), 1);
        cart.add_item(Arc::clone(&heels), 2, Some("38"), Some("Black"));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Price::new(2_037_000));
        assert_eq!(cart.items().len(), 1);
    }

    {
        let mut cart = CartStore::new(Arc::clone(&storage));
        cart.update_quantity(&heels.id, 1, Some("38"), Some("Black"));
        assert_eq!(cart.total_price(), Price::new(679_000));
    }

    let mut cart = CartStore::new(Arc::clone(&storage));
    cart.remove_item(&heels.id, Some("38"), Some("Black"));
    assert_eq!(cart.total_items(), 0);

    let reloaded = CartStore::new(storage);
    assert!(reloaded.items().is_empty());
}

#[test]
fn test_reload_preserves_order_and_variants() {
    let (_dir, storage, catalog) = setup();
    let find = |id: &str| catalog.find(&ProductId::new(id)).unwrap();

    {
        let mut cart = CartStore::new(Arc::clone(&storage));
        cart.add_item(find("7"), 1, Some("38"), Some("Black"));
        cart.add_item(find("7"), 1, Some("39"), Some("Black"));
        cart.add_item(find("3"), 2, None, Some("Olive"));
        cart.add_item(find("7"), 1, Some("38"), Some(""));
    }

    let cart = CartStore::new(storage);
    let lines: Vec<_> = cart
        .items()
        .iter()
        .map(|l| (l.product.id.as_str(), l.size.as_deref(), l.color.as_deref(), l.quantity))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("7", Some("38"), Some("Black"), 1),
            ("7", Some("39"), Some("Black"), 1),
            ("3", None, Some("Olive"), 2),
            ("7", Some("38"), Some(""), 1),
        ]
    );
    assert_eq!(cart.total_items(), 5);
    assert_eq!(
        cart.total_price(),
        Price::new(679_000 * 3 + 459_000 * 2)
    );
}

#[test]
fn test_persisted_slot_is_readable_json() {
    let (dir, storage, catalog) = setup();
    let mut cart = CartStore::new(storage);
    cart.add_item(catalog.find(&ProductId::new("12")).unwrap(), 2, None, Some("Floral"));

    let raw = std::fs::read_to_string(dir.path().join("cart-storage.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], 0);
    let line = &json["state"]["items"][0];
    assert_eq!(line["product"]["id"], "12");
    assert_eq!(line["product"]["price"], 589_000);
    assert_eq!(line["quantity"], 2);
    assert_eq!(line["color"], "Floral");
    assert!(line.get("size").is_none());
}

#[test]
fn test_corrupt_slot_starts_empty_and_recovers() {
    let (_dir, storage, catalog) = setup();
    storage.save(keys::CART, "{\"state\": {\"items\": [").unwrap();

    let mut cart = CartStore::new(Arc::clone(&storage));
    assert!(cart.items().is_empty());

    cart.add_item(catalog.find(&ProductId::new("1")).unwrap(), 1, None, Some("Tan"));
    let reloaded = CartStore::new(storage);
    assert_eq!(reloaded.total_items(), 1);
}

#[test]
fn test_summary_threshold_after_reload() {
    let (_dir, storage, catalog) = setup();
    {
        let mut cart = CartStore::new(Arc::clone(&storage));
        cart.add_item(catalog.find(&ProductId::new("5")).unwrap(), 1, Some("S"), None);
    }

    let mut cart = CartStore::new(Arc::clone(&storage));
    let summary = cart.summary();
    assert_eq!(summary.shipping, Price::new(15_000));
    assert_eq!(summary.total, Price::new(274_000));

    cart.update_quantity(&ProductId::new("5"), 2, Some("S"), None);
    let summary = cart.summary();
    assert!(summary.free_shipping());
    assert_eq!(summary.total, Price::new(518_000));
}
