//! Catalog records: products and their categories.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId, SubcategoryId};
use super::price::Price;

/// Minimum rating for a product to be featured without a sale or new flag.
pub const FEATURED_MIN_RATING: f32 = 4.7;

/// An immutable catalog product.
///
/// Products are owned by the catalog and shared by `Arc` with every cart line
/// and wishlist entry that refers to them; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Image references in display order; the first one is the thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Average review score between 0 and 5.
    pub rating: f32,
    pub reviews: u32,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sale: Option<bool>,
    /// Advertised discount percentage, if the catalog sets one explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
}

impl Product {
    /// The thumbnail image, if the product has any images.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product carries the "new arrival" flag.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new.unwrap_or(false)
    }

    /// Whether the product carries the "on sale" flag.
    #[must_use]
    pub fn is_sale(&self) -> bool {
        self.is_sale.unwrap_or(false)
    }

    /// Featured products are on sale, new, or rated at least 4.7.
    #[must_use]
    pub fn is_featured(&self) -> bool {
        self.is_sale() || self.is_new() || self.rating >= FEATURED_MIN_RATING
    }

    /// Percentage saved against the original price, rounded to the nearest
    /// whole percent.
    ///
    /// Returns `None` when there is no original price or it does not exceed
    /// the current price.
    #[must_use]
    pub fn discount_percentage(&self) -> Option<u8> {
        let original = self.original_price?.amount();
        let price = self.price.amount();
        if original == 0 || original <= price {
            return None;
        }
        // Integer round-half-up of (original - price) * 100 / original.
        let saved = (original - price).saturating_mul(100);
        let pct = (saved.saturating_mul(2) + original) / (original * 2);
        u8::try_from(pct).ok()
    }

    /// Whether `size` is one of the offered sizes.
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes
            .as_deref()
            .is_some_and(|sizes| sizes.iter().any(|s| s == size))
    }

    /// Whether `color` is one of the offered colors.
    #[must_use]
    pub fn offers_color(&self, color: &str) -> bool {
        self.colors
            .as_deref()
            .is_some_and(|colors| colors.iter().any(|c| c == color))
    }
}

/// A top-level catalog category (e.g., "Tas", "Sepatu").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// A subcategory nested under a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
    pub slug: String,
    pub category_id: CategoryId,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A minimal in-stock product with the given id and price.
    pub(crate) fn product(id: &str, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::new(price),
            original_price: None,
            images: vec![format!("/product{id}.webp")],
            category: "Sepatu".to_string(),
            subcategory: "High Heels".to_string(),
            tags: Vec::new(),
            rating: 4.0,
            reviews: 0,
            in_stock: true,
            sizes: Some(vec!["37".to_string(), "38".to_string()]),
            colors: Some(vec!["Black".to_string(), "Nude".to_string()]),
            material: None,
            brand: None,
            is_new: None,
            is_sale: None,
            discount: None,
        }
    }
}
