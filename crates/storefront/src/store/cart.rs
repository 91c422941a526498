//! Cart store: the authoritative line items for one session.

use std::sync::Arc;

use boutique_core::{
    CartAction, CartLineItem, CartState, CartSummary, Price, Product, ProductId, ShippingPolicy,
    VariantKey,
};
use tracing::debug;

use super::{Store, SubscriptionId};
use crate::storage::{MemoryStorage, StorageSlot, keys};

/// Observable cart, persisted under [`keys::CART`].
///
/// Every operation is total: removing or updating a line that does not
/// exist is a no-op, and updating a line to quantity 0 removes it.
#[derive(Debug)]
pub struct CartStore {
    store: Store<CartState>,
    shipping: ShippingPolicy,
}

impl CartStore {
    /// Create a cart restored from `storage`.
    pub fn new(storage: Arc<dyn StorageSlot>) -> Self {
        Self {
            store: Store::persisted(storage, keys::CART),
            shipping: ShippingPolicy::default(),
        }
    }

    /// Create a cart backed by fresh in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Replace the shipping policy used by [`summary`](Self::summary).
    #[must_use]
    pub fn with_shipping(mut self, shipping: ShippingPolicy) -> Self {
        self.shipping = shipping;
        self
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.store.state().items()
    }

    /// The full committed state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        self.store.state()
    }

    /// Add `quantity` units of a product variant, merging with an existing
    /// line of the same product, size and color.
    ///
    /// A quantity of 0 is ignored.
    pub fn add_item(
        &mut self,
        product: Arc<Product>,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) {
        debug!(product_id = %product.id, quantity, ?size, ?color, "cart add");
        self.store.dispatch(&CartAction::Add {
            product,
            quantity,
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
        });
    }

    /// Delete the line with exactly this product, size and color.
    pub fn remove_item(&mut self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) {
        debug!(%product_id, ?size, ?color, "cart remove");
        self.store
            .dispatch(&CartAction::Remove(key(product_id, size, color)));
    }

    /// Overwrite the quantity of a line; 0 removes it.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) {
        debug!(%product_id, quantity, ?size, ?color, "cart update");
        self.store.dispatch(&CartAction::UpdateQuantity {
            key: key(product_id, size, color),
            quantity,
        });
    }

    /// Apply a quantity from signed client input.
    ///
    /// Zero or negative removes the line. Amounts above `u32::MAX` clamp.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) {
        match u32::try_from(quantity) {
            Ok(0) => self.remove_item(product_id, size, color),
            Ok(quantity) => self.update_quantity(product_id, quantity, size, color),
            Err(_) if quantity < 0 => self.remove_item(product_id, size, color),
            Err(_) => self.update_quantity(product_id, u32::MAX, size, color),
        }
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        debug!("cart clear");
        self.store.dispatch(&CartAction::Clear);
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.state().total_items()
    }

    /// Sum of price times quantity across lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.state().total_price()
    }

    /// Subtotal, shipping and total under the configured policy.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.state().summary(&self.shipping)
    }

    /// Register a listener for committed changes.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CartState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    /// Remove a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

fn key(product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> VariantKey {
    VariantKey::new(product_id.clone(), size, color)
}
