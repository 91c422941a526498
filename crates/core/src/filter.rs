//! Catalog filtering and sorting.
//!
//! Empty constraint lists mean "no constraint": a default [`FilterOptions`]
//! keeps every product in catalog order.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product};

/// Error returned when parsing an unknown [`SortBy`] or [`ProductFlag`] name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
}

/// Product list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Catalog order.
    #[default]
    Featured,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// New arrivals first, otherwise catalog order.
    Newest,
    /// Highest rated first; ties broken by review count.
    Rating,
}

impl SortBy {
    /// The kebab-case name used in query strings and the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Newest => "newest",
            Self::Rating => "rating",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Featured => Ordering::Equal,
            Self::PriceLow => a.price.cmp(&b.price),
            Self::PriceHigh => b.price.cmp(&a.price),
            Self::Newest => b.is_new().cmp(&a.is_new()),
            Self::Rating => b
                .rating
                .total_cmp(&a.rating)
                .then_with(|| b.reviews.cmp(&a.reviews)),
        }
    }
}

impl FromStr for SortBy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "newest" => Ok(Self::Newest),
            "rating" => Ok(Self::Rating),
            other => Err(ParseOptionError {
                kind: "sort order",
                value: other.to_string(),
            }),
        }
    }
}

/// Merchandising flags a listing can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFlag {
    New,
    Sale,
    Featured,
}

impl ProductFlag {
    /// Whether `product` carries this flag.
    #[must_use]
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::New => product.is_new(),
            Self::Sale => product.is_sale(),
            Self::Featured => product.is_featured(),
        }
    }
}

impl FromStr for ProductFlag {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "sale" => Ok(Self::Sale),
            "featured" => Ok(Self::Featured),
            other => Err(ParseOptionError {
                kind: "product flag",
                value: other.to_string(),
            }),
        }
    }
}

/// Listing constraints chosen by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub subcategories: Vec<String>,
    /// Inclusive `(min, max)` price bounds.
    pub price_range: Option<(Price, Price)>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub brands: Vec<String>,
    /// Minimum average rating; 0 keeps everything.
    pub min_rating: f32,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub flag: Option<ProductFlag>,
    pub in_stock_only: bool,
    pub sort_by: SortBy,
}

impl FilterOptions {
    /// Whether a single product passes every constraint.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let any_of = |wanted: &[String], have: &str| wanted.is_empty() || wanted.iter().any(|w| w == have);

        any_of(&self.categories, &product.category)
            && any_of(&self.subcategories, &product.subcategory)
            && self
                .price_range
                .is_none_or(|(min, max)| product.price >= min && product.price <= max)
            && (self.sizes.is_empty() || self.sizes.iter().any(|s| product.offers_size(s)))
            && (self.colors.is_empty() || self.colors.iter().any(|c| product.offers_color(c)))
            && (self.brands.is_empty()
                || product
                    .brand
                    .as_deref()
                    .is_some_and(|brand| self.brands.iter().any(|b| b == brand)))
            && product.rating >= self.min_rating
            && self.search.as_deref().is_none_or(|query| {
                product
                    .name
                    .to_lowercase()
                    .contains(&query.trim().to_lowercase())
            })
            && self.flag.is_none_or(|flag| flag.matches(product))
            && (!self.in_stock_only || product.in_stock)
    }

    /// Filter and sort `products`, returning shared handles.
    ///
    /// Sorting is stable, so products that compare equal keep catalog order.
    pub fn apply<'a, I>(&self, products: I) -> Vec<Arc<Product>>
    where
        I: IntoIterator<Item = &'a Arc<Product>>,
    {
        let mut out: Vec<Arc<Product>> = products
            .into_iter()
            .filter(|product| self.matches(product))
            .cloned()
            .collect();
        let sort_by = self.sort_by;
        out.sort_by(|a, b| sort_by.compare(a, b));
        out
    }
}
