//! Shared fixtures for unit tests.

use std::sync::Arc;

use boutique_core::{Price, Product, ProductId};

/// A shoe with two sizes and two colors.
pub fn product(id: &str, price: u64) -> Arc<Product> {
    Arc::new(Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: String::new(),
        price: Price::new(price),
        original_price: None,
        images: vec![format!("/images/{id}.webp")],
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
    })
}
