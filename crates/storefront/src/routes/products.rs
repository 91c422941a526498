//! Product route handlers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use boutique_core::{FilterOptions, Price, Product, ProductFlag, ProductId, SortBy};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Maximum number of related products on a detail response.
const RELATED_LIMIT: usize = 4;

/// Product data with display helpers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Arc<Product>,
    pub price_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u8>,
    pub featured: bool,
}

impl From<&Arc<Product>> for ProductView {
    fn from(product: &Arc<Product>) -> Self {
        Self {
            price_display: product.price.display(),
            original_price_display: product.original_price.map(Price::display),
            discount_percentage: product.discount_percentage(),
            featured: product.is_featured(),
            product: Arc::clone(product),
        }
    }
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub count: usize,
    pub products: Vec<ProductView>,
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: ProductView,
    pub related: Vec<ProductView>,
}

/// Listing query parameters.
///
/// List-valued parameters are comma separated, e.g. `?size=37,38`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_rating: Option<f32>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub flag: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductQuery {
    /// Convert query parameters into catalog filter options.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for unknown sort orders or flags, or an
    /// inverted price range.
    pub fn into_options(self) -> Result<FilterOptions> {
        let sort_by = self
            .sort
            .as_deref()
            .map(str::parse::<SortBy>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .unwrap_or_default();
        let flag = self
            .flag
            .as_deref()
            .map(str::parse::<ProductFlag>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let price_range = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => {
                let min = min.unwrap_or(0);
                let max = max.unwrap_or(u64::MAX);
                if min > max {
                    return Err(AppError::BadRequest(format!(
                        "min_price {min} exceeds max_price {max}"
                    )));
                }
                Some((Price::new(min), Price::new(max)))
            }
        };

        Ok(FilterOptions {
            categories: split_list(self.category.as_deref()),
            subcategories: split_list(self.subcategory.as_deref()),
            price_range,
            sizes: split_list(self.size.as_deref()),
            colors: split_list(self.color.as_deref()),
            brands: split_list(self.brand.as_deref()),
            min_rating: self.min_rating.unwrap_or(0.0),
            search: self.q.filter(|q| !q.trim().is_empty()),
            flag,
            in_stock_only: self.in_stock.unwrap_or(false),
            sort_by,
        })
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// List products matching the query.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductList>> {
    let options = query.into_options()?;
    let products: Vec<ProductView> = state
        .catalog()
        .filter(&options)
        .iter()
        .map(ProductView::from)
        .collect();

    Ok(Json(ProductList {
        count: products.len(),
        products,
    }))
}

/// Show one product plus others from the same subcategory, then category.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>> {
    let catalog = state.catalog();
    let product = catalog
        .find(&ProductId::new(id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut seen = HashSet::from([product.id.clone()]);
    let related = catalog
        .by_subcategory(&product.subcategory)
        .iter()
        .chain(&catalog.by_category(&product.category))
        .filter(|p| seen.insert(p.id.clone()))
        .take(RELATED_LIMIT)
        .map(ProductView::from)
        .collect();

    Ok(Json(ProductDetail {
        product: ProductView::from(&product),
        related,
    }))
}
