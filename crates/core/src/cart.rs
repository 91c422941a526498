//! Cart line items and their merge rules.
//!
//! A cart is an ordered list of [`CartLineItem`]s, one per [`VariantKey`].
//! All mutation goes through [`CartState::apply`], which is pure:
//!
//! - adding a product whose key already has a line increments that line
//! - adding a new key appends a line at the end
//! - updating to quantity 0 removes the line
//! - removing or updating an absent key leaves the cart untouched
//!
//! Totals are always recomputed from the lines and never cached.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::reducer::Reducer;
use crate::types::{Price, Product, VariantKey};

/// One distinct purchasable configuration in the cart.
///
/// `quantity` is at least 1 for every line held by a [`CartState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Arc<Product>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CartLineItem {
    /// The identity key of this line.
    #[must_use]
    pub fn key(&self) -> VariantKey {
        VariantKey {
            product_id: self.product.id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Whether this line has the given identity key.
    #[must_use]
    pub fn has_key(&self, key: &VariantKey) -> bool {
        key.matches(&self.product.id, self.size.as_deref(), self.color.as_deref())
    }

    /// Current product price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }

    /// Original (pre-sale) price times quantity, when the product has one.
    #[must_use]
    pub fn line_original_total(&self) -> Option<Price> {
        self.product.original_price.map(|p| p.times(self.quantity))
    }
}

/// Actions understood by [`CartState`].
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Merge `quantity` units of a product variant into the cart.
    Add {
        product: Arc<Product>,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    },
    /// Delete the line with this key.
    Remove(VariantKey),
    /// Overwrite the quantity of the line with this key; 0 removes it.
    UpdateQuantity { key: VariantKey, quantity: u32 },
    /// Empty the cart.
    Clear,
}

impl CartAction {
    /// Add action with the default variant-less configuration.
    #[must_use]
    pub fn add(product: Arc<Product>, quantity: u32) -> Self {
        Self::Add {
            product,
            quantity,
            size: None,
            color: None,
        }
    }
}

/// The full cart state: ordered line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartLineItem>,
}

impl CartState {
    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line with the given key.
    #[must_use]
    pub fn find(&self, key: &VariantKey) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.has_key(key))
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Subtotal, shipping and grand total under `policy`.
    #[must_use]
    pub fn summary(&self, policy: &ShippingPolicy) -> CartSummary {
        let subtotal = self.total_price();
        let shipping = policy.shipping_for(subtotal, self.is_empty());
        CartSummary {
            item_count: self.total_items(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    fn add(
        mut self,
        product: &Arc<Product>,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Self {
        // Adding zero units would create an empty line; reject it outright.
        if quantity == 0 {
            return self;
        }

        let key = VariantKey {
            product_id: product.id.clone(),
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
        };

        if let Some(line) = self.items.iter_mut().find(|item| item.has_key(&key)) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartLineItem {
                product: Arc::clone(product),
                quantity,
                size: key.size,
                color: key.color,
            });
        }
        self
    }

    fn remove(mut self, key: &VariantKey) -> Self {
        self.items.retain(|item| !item.has_key(key));
        self
    }

    fn update_quantity(mut self, key: &VariantKey, quantity: u32) -> Self {
        if quantity == 0 {
            return self.remove(key);
        }
        if let Some(line) = self.items.iter_mut().find(|item| item.has_key(key)) {
            line.quantity = quantity;
        }
        self
    }
}

impl Reducer for CartState {
    type Action = CartAction;

    fn apply(self, action: &CartAction) -> Self {
        match action {
            CartAction::Add {
                product,
                quantity,
                size,
                color,
            } => self.add(product, *quantity, size.as_deref(), color.as_deref()),
            CartAction::Remove(key) => self.remove(key),
            CartAction::UpdateQuantity { key, quantity } => self.update_quantity(key, *quantity),
            CartAction::Clear => Self::default(),
        }
    }

    fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .all(|item| item.quantity >= 1 && seen.insert(item.key()))
    }
}

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Subtotals strictly above this amount ship for free.
    pub free_threshold: Price,
    /// Shipping charged at or below the threshold.
    pub flat_rate: Price,
}

impl ShippingPolicy {
    /// Free shipping above Rp 500.000.
    pub const DEFAULT_FREE_THRESHOLD: Price = Price::new(500_000);
    /// Rp 15.000 flat rate otherwise.
    pub const DEFAULT_FLAT_RATE: Price = Price::new(15_000);

    /// Shipping charged for a cart with the given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Price, empty: bool) -> Price {
        if empty || subtotal > self.free_threshold {
            Price::ZERO
        } else {
            self.flat_rate
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Self::DEFAULT_FREE_THRESHOLD,
            flat_rate: Self::DEFAULT_FLAT_RATE,
        }
    }
}

/// Derived checkout figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl CartSummary {
    /// Whether shipping is waived for this cart.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping == Price::ZERO
    }
}
