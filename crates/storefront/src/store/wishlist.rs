//! Wishlist store: favorited products for one session.

use std::sync::Arc;

use boutique_core::{Product, ProductId, WishlistAction, WishlistEntry, WishlistState};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Store, SubscriptionId};
use crate::storage::{MemoryStorage, StorageSlot, keys};

/// Source of `added_at` timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Observable wishlist, persisted under [`keys::WISHLIST`].
#[derive(Debug)]
pub struct WishlistStore {
    store: Store<WishlistState>,
    clock: Clock,
}

impl WishlistStore {
    /// Create a wishlist restored from `storage`.
    pub fn new(storage: Arc<dyn StorageSlot>) -> Self {
        Self::with_clock(storage, Utc::now)
    }

    /// Create a wishlist that stamps entries using `clock`.
    pub fn with_clock(storage: Arc<dyn StorageSlot>, clock: Clock) -> Self {
        Self {
            store: Store::persisted(storage, keys::WISHLIST),
            clock,
        }
    }

    /// Create a wishlist backed by fresh in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Entries in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[WishlistEntry] {
        self.store.state().items()
    }

    /// The full committed state.
    #[must_use]
    pub const fn state(&self) -> &WishlistState {
        self.store.state()
    }

    /// Add `product` unless it is already present.
    pub fn add_item(&mut self, product: Arc<Product>) {
        debug!(product_id = %product.id, "wishlist add");
        let added_at = (self.clock)();
        self.store
            .dispatch(&WishlistAction::Add { product, added_at });
    }

    /// Remove the entry for `product_id`, if any.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        debug!(%product_id, "wishlist remove");
        self.store
            .dispatch(&WishlistAction::Remove(product_id.clone()));
    }

    /// Add when absent, remove when present. Returns the new membership.
    pub fn toggle(&mut self, product: Arc<Product>) -> bool {
        debug!(product_id = %product.id, "wishlist toggle");
        let id = product.id.clone();
        let added_at = (self.clock)();
        self.store
            .dispatch(&WishlistAction::Toggle { product, added_at });
        self.is_in_wishlist(&id)
    }

    /// Remove every entry.
    pub fn clear_wishlist(&mut self) {
        debug!("wishlist clear");
        self.store.dispatch(&WishlistAction::Clear);
    }

    /// Whether `product_id` is currently favorited.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.state().contains(product_id)
    }

    /// Register a listener for committed changes.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&WishlistState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    /// Remove a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::test_support::product;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_add_is_idempotent_by_product_id() {
        let mut wishlist = WishlistStore::in_memory();
        let p = product("7", 679_000);
        wishlist.add_item(Arc::clone(&p));
        wishlist.add_item(Arc::clone(&p));

        assert_eq!(wishlist.items().len(), 1);
        assert!(wishlist.is_in_wishlist(&p.id));

        wishlist.remove_item(&p.id);
        assert!(!wishlist.is_in_wishlist(&p.id));
    }

    #[test]
    fn test_toggle_reports_membership() {
        let mut wishlist = WishlistStore::in_memory();
        let p = product("12", 589_000);
        assert!(wishlist.toggle(Arc::clone(&p)));
        assert!(!wishlist.toggle(p));
        assert!(wishlist.items().is_empty());
    }

    #[test]
    fn test_clear_then_nothing_is_member() {
        let mut wishlist = WishlistStore::in_memory();
        for id in ["1", "2", "3"] {
            wishlist.add_item(product(id, 1));
        }
        wishlist.clear_wishlist();
        for id in ["1", "2", "3"] {
            assert!(!wishlist.is_in_wishlist(&ProductId::new(id)));
        }
    }

    #[test]
    fn test_reload_keeps_timestamps() {
        let storage: Arc<dyn StorageSlot> = Arc::new(MemoryStorage::new());
        {
            let mut wishlist = WishlistStore::with_clock(Arc::clone(&storage), fixed_clock);
            wishlist.add_item(product("10", 1_299_000));
        }

        let wishlist = WishlistStore::new(storage);
        assert_eq!(wishlist.items().len(), 1);
        assert_eq!(wishlist.items()[0].added_at, fixed_clock());
    }

    #[test]
    fn test_malformed_slot_starts_empty() {
        let storage: Arc<dyn StorageSlot> = Arc::new(MemoryStorage::new());
        storage
            .save(keys::WISHLIST, r#"{"state":{"items":[{"product":"7"}]}}"#)
            .unwrap();

        let mut wishlist = WishlistStore::new(Arc::clone(&storage));
        assert!(wishlist.items().is_empty());

        // The next write replaces the bad slot.
        wishlist.add_item(product("7", 1));
        let reloaded = WishlistStore::new(storage);
        assert!(reloaded.is_in_wishlist(&ProductId::new("7")));
    }
}
