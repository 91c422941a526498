//! Cart route handlers.
//!
//! Every mutating handler responds with the full cart so clients can re-render
//! line items and the order summary from a single response.

use axum::{Json, extract::State};
use boutique_core::{CartLineItem, CartSummary, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::products::ProductView;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::store::CartStore;

/// Cart line display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product: ProductView,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub line_total: u64,
    pub line_total_display: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let total = line.line_total();
        Self {
            product: ProductView::from(&line.product),
            quantity: line.quantity,
            size: line.size.clone(),
            color: line.color.clone(),
            line_total: total.amount(),
            line_total_display: total.display(),
        }
    }
}

/// Order summary display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub item_count: u64,
    pub subtotal: u64,
    pub shipping: u64,
    pub total: u64,
    pub free_shipping: bool,
    pub subtotal_display: String,
    pub shipping_display: String,
    pub total_display: String,
}

impl From<CartSummary> for SummaryView {
    fn from(summary: CartSummary) -> Self {
        Self {
            item_count: summary.item_count,
            subtotal: summary.subtotal.amount(),
            shipping: summary.shipping.amount(),
            total: summary.total.amount(),
            free_shipping: summary.free_shipping(),
            subtotal_display: summary.subtotal.display(),
            shipping_display: summary.shipping.display(),
            total_display: summary.total.display(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub summary: SummaryView,
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            summary: SummaryView::from(cart.summary()),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

const fn default_quantity() -> u32 {
    1
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Update quantity request body. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: String,
    pub quantity: i64,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Remove line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: String,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().lock().await;
    Json(CartView::from(&*cart))
}

/// Add a product variant to the cart.
///
/// Unknown product ids are rejected; everything else merges into the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .find(&ProductId::new(body.product_id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let mut cart = state.cart().lock().await;
    cart.add_item(
        product,
        body.quantity,
        body.size.as_deref(),
        body.color.as_deref(),
    );
    Ok(Json(CartView::from(&*cart)))
}

/// Overwrite the quantity of a line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<UpdateCartRequest>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.set_quantity(
        &ProductId::new(body.product_id),
        body.quantity,
        body.size.as_deref(),
        body.color.as_deref(),
    );
    Json(CartView::from(&*cart))
}

/// Remove one line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveFromCartRequest>,
) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.remove_item(
        &ProductId::new(body.product_id),
        body.size.as_deref(),
        body.color.as_deref(),
    );
    Json(CartView::from(&*cart))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartView> {
    let mut cart = state.cart().lock().await;
    cart.clear_cart();
    Json(CartView::from(&*cart))
}

/// Total quantity across lines.
pub async fn count(State(state): State<AppState>) -> Json<CartCount> {
    let count = state.cart().lock().await.total_items();
    Json(CartCount { count })
}
