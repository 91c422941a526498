//! Wishlist entries, deduplicated by product id.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reducer::Reducer;
use crate::types::{Product, ProductId};

/// A favorited product and when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product: Arc<Product>,
    pub added_at: DateTime<Utc>,
}

/// Actions understood by [`WishlistState`].
///
/// Timestamps travel inside the action so that applying it stays pure.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistAction {
    /// Add the product unless it is already present.
    Add {
        product: Arc<Product>,
        added_at: DateTime<Utc>,
    },
    /// Remove the entry for this product id.
    Remove(ProductId),
    /// Add when absent, remove when present.
    Toggle {
        product: Arc<Product>,
        added_at: DateTime<Utc>,
    },
    /// Empty the wishlist.
    Clear,
}

/// The full wishlist state. A product id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WishlistState {
    pub items: Vec<WishlistEntry>,
}

impl WishlistState {
    /// Entries in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[WishlistEntry] {
        &self.items
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the wishlist has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an entry for `product_id` exists.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|entry| entry.product.id == *product_id)
    }

    fn add(mut self, product: &Arc<Product>, added_at: DateTime<Utc>) -> Self {
        if !self.contains(&product.id) {
            self.items.push(WishlistEntry {
                product: Arc::clone(product),
                added_at,
            });
        }
        self
    }

    fn remove(mut self, product_id: &ProductId) -> Self {
        self.items.retain(|entry| entry.product.id != *product_id);
        self
    }
}

impl Reducer for WishlistState {
    type Action = WishlistAction;

    fn apply(self, action: &WishlistAction) -> Self {
        match action {
            WishlistAction::Add { product, added_at } => self.add(product, *added_at),
            WishlistAction::Remove(product_id) => self.remove(product_id),
            WishlistAction::Toggle { product, added_at } => {
                if self.contains(&product.id) {
                    self.remove(&product.id)
                } else {
                    self.add(product, *added_at)
                }
            }
            WishlistAction::Clear => Self::default(),
        }
    }

    fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items.iter().all(|entry| seen.insert(&entry.product.id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::product::fixtures::product;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let p = Arc::new(product("7", 679_000));
        let list = WishlistState::default()
            .apply(&WishlistAction::Add {
                product: Arc::clone(&p),
                added_at: at(100),
            })
            .apply(&WishlistAction::Add {
                product: Arc::clone(&p),
                added_at: at(200),
            });

        assert_eq!(list.len(), 1);
        // The first timestamp wins; a repeated add is a no-op.
        assert_eq!(list.items[0].added_at, at(100));
    }

    #[test]
    fn test_membership_follows_add_and_remove() {
        let p = Arc::new(product("7", 679_000));
        let id = p.id.clone();

        let list = WishlistState::default().apply(&WishlistAction::Add {
            product: p,
            added_at: at(1),
        });
        assert!(list.contains(&id));

        let list = list.apply(&WishlistAction::Remove(id.clone()));
        assert!(!list.contains(&id));
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let p = Arc::new(product("7", 1));
        let list = WishlistState::default().apply(&WishlistAction::Add {
            product: p,
            added_at: at(1),
        });
        let after = list.clone().apply(&WishlistAction::Remove(ProductId::new("8")));
        assert_eq!(after, list);
    }

    #[test]
    fn test_toggle_flips_membership() {
        let p = Arc::new(product("3", 1));
        let toggle = WishlistAction::Toggle {
            product: Arc::clone(&p),
            added_at: at(5),
        };

        let list = WishlistState::default().apply(&toggle);
        assert!(list.contains(&p.id));

        let list = list.apply(&toggle);
        assert!(!list.contains(&p.id));
    }

    #[test]
    fn test_clear_removes_everything() {
        let list = ["1", "2", "3"]
            .into_iter()
            .fold(WishlistState::default(), |list, id| {
                list.apply(&WishlistAction::Add {
                    product: Arc::new(product(id, 1)),
                    added_at: at(0),
                })
            })
            .apply(&WishlistAction::Clear);

        assert!(list.is_empty());
        assert!(!list.contains(&ProductId::new("1")));
    }

    #[test]
    fn test_consistency_rejects_duplicate_ids() {
        let p = Arc::new(product("7", 1));
        let entry = WishlistEntry {
            product: p,
            added_at: at(0),
        };
        let list = WishlistState {
            items: vec![entry.clone()],
        };
        assert!(list.is_consistent());

        let doubled = WishlistState {
            items: vec![entry.clone(), entry],
        };
        assert!(!doubled.is_consistent());
    }

    #[test]
    fn test_serializes_added_at_in_camel_case() {
        let list = WishlistState::default().apply(&WishlistAction::Add {
            product: Arc::new(product("7", 1)),
            added_at: at(0),
        });
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.contains("\"addedAt\":\"1970-01-01T00:00:00Z\""));

        let restored: WishlistState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, list);
    }
}
