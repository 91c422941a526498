//! Category route handlers.

use axum::{Json, extract::State};
use boutique_core::Category;
use serde::Serialize;

use crate::state::AppState;

/// A category with the number of products filed under it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: usize,
}

/// List categories in catalog order.
pub async fn index(State(state): State<AppState>) -> Json<Vec<CategoryView>> {
    let catalog = state.catalog();
    let categories = catalog
        .categories()
        .iter()
        .map(|category| CategoryView {
            product_count: catalog.by_category(&category.slug).len(),
            category: category.clone(),
        })
        .collect();
    Json(categories)
}
