//! Read-only product catalog.
//!
//! The catalog ships embedded in the binary and can be replaced at startup by
//! a JSON file with the same shape:
//!
//! ```json
//! { "categories": [ ... ], "products": [ ... ] }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use boutique_core::{Category, FilterOptions, Product, ProductId, Subcategory};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id '{0}'")]
    DuplicateProduct(ProductId),
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// An ordered, immutable product list plus its category tree.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    categories: Vec<Category>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded data is invalid.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), products = catalog.products.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Parse a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on malformed JSON or repeated product ids.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let mut seen = HashSet::with_capacity(file.products.len());
        for product in &file.products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self::new(file.products, file.categories))
    }

    /// Build a catalog from in-memory products.
    #[must_use]
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products: products.into_iter().map(Arc::new).collect(),
            categories,
        }
    }

    /// Every product in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Arc<Product>] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<Arc<Product>> {
        self.products.iter().find(|p| p.id == *id).cloned()
    }

    /// Top-level categories with their subcategories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category by slug or display name, ignoring case.
    #[must_use]
    pub fn category(&self, name_or_slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| {
            c.slug.eq_ignore_ascii_case(name_or_slug) || c.name.eq_ignore_ascii_case(name_or_slug)
        })
    }

    fn subcategory(&self, name_or_slug: &str) -> Option<&Subcategory> {
        self.categories
            .iter()
            .flat_map(|c| &c.subcategories)
            .find(|s| {
                s.slug.eq_ignore_ascii_case(name_or_slug)
                    || s.name.eq_ignore_ascii_case(name_or_slug)
            })
    }

    /// Products in a category, given by slug or name.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Arc<Product>> {
        let name = self.category(category).map_or(category, |c| c.name.as_str());
        self.collect(|p| p.category.eq_ignore_ascii_case(name))
    }

    /// Products in a subcategory, given by slug or name.
    #[must_use]
    pub fn by_subcategory(&self, subcategory: &str) -> Vec<Arc<Product>> {
        let name = self
            .subcategory(subcategory)
            .map_or(subcategory, |s| s.name.as_str());
        self.collect(|p| p.subcategory.eq_ignore_ascii_case(name))
    }

    /// Products on sale, new, or rated highly.
    #[must_use]
    pub fn featured(&self) -> Vec<Arc<Product>> {
        self.collect(|p| p.is_featured())
    }

    #[must_use]
    pub fn new_arrivals(&self) -> Vec<Arc<Product>> {
        self.collect(|p| p.is_new())
    }

    #[must_use]
    pub fn on_sale(&self) -> Vec<Arc<Product>> {
        self.collect(|p| p.is_sale())
    }

    /// Case-insensitive name match. A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Arc<Product>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.collect(|p| p.name.to_lowercase().contains(&needle))
    }

    /// Apply shopper filters and ordering.
    ///
    /// Category and subcategory constraints may be slugs; they are resolved
    /// to display names before matching.
    #[must_use]
    pub fn filter(&self, options: &FilterOptions) -> Vec<Arc<Product>> {
        let mut resolved = options.clone();
        resolved.categories = options
            .categories
            .iter()
            .map(|c| self.category(c).map_or_else(|| c.clone(), |c| c.name.clone()))
            .collect();
        resolved.subcategories = options
            .subcategories
            .iter()
            .map(|s| {
                self.subcategory(s)
                    .map_or_else(|| s.clone(), |s| s.name.clone())
            })
            .collect();
        resolved.apply(&self.products)
    }

    fn collect(&self, keep: impl Fn(&Product) -> bool) -> Vec<Arc<Product>> {
        self.products.iter().filter(|p| keep(p)).cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use boutique_core::{Price, ProductFlag, SortBy};

    use super::*;

    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    fn ids(products: &[Arc<Product>]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.categories().len(), 4);

        let heels = catalog.find(&ProductId::new("7")).unwrap();
        assert_eq!(heels.name, "Classic High Heels");
        assert_eq!(heels.price, Price::new(679_000));
        assert!(heels.offers_size("38"));
        assert!(heels.offers_color("Black"));
    }

    #[test]
    fn test_find_unknown_is_none() {
        assert!(catalog().find(&ProductId::new("999")).is_none());
    }

    #[test]
    fn test_by_category_accepts_slug_or_name() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.by_category("sepatu")), vec!["7", "8", "9"]);
        assert_eq!(ids(&catalog.by_category("Sepatu")), vec!["7", "8", "9"]);
        assert!(catalog.by_category("furniture").is_empty());
    }

    #[test]
    fn test_by_subcategory() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.by_subcategory("high-heels")), vec!["7"]);
        assert_eq!(ids(&catalog.by_subcategory("Jam Tangan")), vec!["10"]);
    }

    #[test]
    fn test_merchandising_lists() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.new_arrivals()), vec!["2", "5", "8", "10"]);
        assert_eq!(ids(&catalog.on_sale()), vec!["1", "4", "7", "12"]);
        for product in catalog.featured() {
            assert!(product.is_sale() || product.is_new() || product.rating >= 4.7);
        }
        assert!(!ids(&catalog.featured()).contains(&"9"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(ids(&catalog.search("ELEGANT")), vec!["1", "5", "10"]);
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn test_filter_resolves_slugs_and_sorts() {
        let catalog = catalog();
        let options = FilterOptions {
            categories: vec!["tas".to_string()],
            sort_by: SortBy::PriceLow,
            ..FilterOptions::default()
        };
        assert_eq!(ids(&catalog.filter(&options)), vec!["3", "2", "1"]);

        let options = FilterOptions {
            flag: Some(ProductFlag::Sale),
            sizes: vec!["38".to_string()],
            ..FilterOptions::default()
        };
        assert_eq!(ids(&catalog.filter(&options)), vec!["7"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"{"products": [
            {"id":"1","name":"A","description":"","price":1,"images":[],"category":"X","subcategory":"Y","rating":4.0,"reviews":0,"inStock":true},
            {"id":"1","name":"B","description":"","price":2,"images":[],"category":"X","subcategory":"Y","rating":4.0,"reviews":0,"inStock":true}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(raw),
            Err(CatalogError::DuplicateProduct(_))
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Catalog::from_path(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
