//! Wishlist route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use boutique_core::{Product, ProductId, WishlistEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::products::ProductView;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::WishlistStore;

/// Wishlist entry display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemView {
    pub product: ProductView,
    pub added_at: DateTime<Utc>,
}

impl From<&WishlistEntry> for WishlistItemView {
    fn from(entry: &WishlistEntry) -> Self {
        Self {
            product: ProductView::from(&entry.product),
            added_at: entry.added_at,
        }
    }
}

/// Wishlist display data.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub count: usize,
    pub items: Vec<WishlistItemView>,
}

impl From<&WishlistStore> for WishlistView {
    fn from(wishlist: &WishlistStore) -> Self {
        Self {
            count: wishlist.items().len(),
            items: wishlist.items().iter().map(WishlistItemView::from).collect(),
        }
    }
}

/// Membership response.
#[derive(Debug, Serialize)]
pub struct Membership {
    pub product_id: ProductId,
    pub in_wishlist: bool,
}

/// Add to wishlist request body.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistRequest {
    pub product_id: String,
}

fn lookup(state: &AppState, id: &str) -> Result<Arc<Product>> {
    state
        .catalog()
        .find(&ProductId::new(id))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Display the wishlist.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<WishlistView> {
    let wishlist = state.wishlist().lock().await;
    Json(WishlistView::from(&*wishlist))
}

/// Add a product; adding one already present changes nothing.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToWishlistRequest>,
) -> Result<Json<WishlistView>> {
    let product = lookup(&state, &body.product_id)?;
    let mut wishlist = state.wishlist().lock().await;
    wishlist.add_item(product);
    Ok(Json(WishlistView::from(&*wishlist)))
}

/// Flip membership of a product.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Membership>> {
    let product = lookup(&state, &id)?;
    let product_id = product.id.clone();
    let in_wishlist = state.wishlist().lock().await.toggle(product);
    Ok(Json(Membership {
        product_id,
        in_wishlist,
    }))
}

/// Whether a product is in the wishlist.
pub async fn contains(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Membership> {
    let product_id = ProductId::new(id);
    let in_wishlist = state.wishlist().lock().await.is_in_wishlist(&product_id);
    Json(Membership {
        product_id,
        in_wishlist,
    })
}

/// Remove a product, if present.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<WishlistView> {
    let mut wishlist = state.wishlist().lock().await;
    wishlist.remove_item(&ProductId::new(id));
    Json(WishlistView::from(&*wishlist))
}

/// Empty the wishlist.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<WishlistView> {
    let mut wishlist = state.wishlist().lock().await;
    wishlist.clear_wishlist();
    Json(WishlistView::from(&*wishlist))
}
