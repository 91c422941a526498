//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Health check
//! GET    /health/ready                 - Storage slots readable
//!
//! # Catalog
//! GET    /categories                   - Category tree with product counts
//! GET    /products                     - Filtered, sorted product listing
//! GET    /products/{id}                - Product detail
//!
//! # Cart
//! GET    /cart                         - Line items and order summary
//! POST   /cart/items                   - Add (merges with an existing line)
//! PATCH  /cart/items                   - Set quantity (0 or less removes)
//! DELETE /cart/items                   - Remove one line
//! DELETE /cart                         - Empty the cart
//! GET    /cart/count                   - Total quantity badge
//!
//! # Wishlist
//! GET    /wishlist                     - Wishlist entries
//! POST   /wishlist/items               - Add a product
//! POST   /wishlist/items/{id}/toggle   - Add or remove a product
//! GET    /wishlist/items/{id}          - Membership check
//! DELETE /wishlist/items/{id}          - Remove a product
//! DELETE /wishlist                     - Empty the wishlist
//! ```

pub mod cart;
pub mod categories;
pub mod products;
pub mod wishlist;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::keys;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route(
            "/items",
            post(cart::add).patch(cart::update).delete(cart::remove),
        )
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).delete(wishlist::clear))
        .route("/items", post(wishlist::add))
        .route(
            "/items/{id}",
            get(wishlist::contains).delete(wishlist::remove),
        )
        .route("/items/{id}/toggle", post(wishlist::toggle))
}

/// Create the main router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/categories", get(categories::index))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies both store slots can be read. Returns 500 if storage is not
/// reachable.
async fn readiness(State(state): State<AppState>) -> Result<&'static str> {
    let storage = Arc::clone(state.storage());
    tokio::task::spawn_blocking(move || {
        for key in [keys::CART, keys::WISHLIST] {
            storage.load(key)?;
        }
        Ok::<_, AppError>(())
    })
    .await
    .map_err(|e| AppError::Internal(format!("readiness check failed: {e}")))??;
    Ok("ok")
}
