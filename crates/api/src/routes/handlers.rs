// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! Handlers for the catalog routes and the health probe. Every handler is
//! generic over the [`ProductStore`] held in [`ServerState`].

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use catalog_types::{FacetField, FilterCriteria, Product};
use serde::Serialize;
use serde_json::Value;
use store_client::ProductStore;
use tracing::debug;
use utoipa::ToSchema;

use crate::{
    error::{ErrorBody, ServerError},
    extractors::CatalogQuery,
    metrics::{inc_requests, timed},
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the health of the service and of the product store it reads from, together with version and environment information.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheck),
        (status = 503, description = "Product store unreachable", body = HealthCheck)
    )
)]
pub async fn health_handler<S: ProductStore + 'static>(
    State(state): State<ServerState<S>>,
) -> impl IntoResponse {
    let health = state.health_check().await;
    let status = if health.status.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}

/// One page of the product listing
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductListResponse {
    /// Products on the requested page that also satisfy the price bounds
    pub data: Vec<Product>,
    /// Number of products in the catalog
    #[schema(example = 120)]
    pub total: u64,
    /// Number of products matching `search`, `category` and `brand`
    #[serde(rename = "totalFilteredProducts")]
    #[schema(example = 14)]
    pub total_filtered_products: u64,
}

/// List products
///
/// Builds the store query from `search`, `category`, `brand`, `sortBy`,
/// `page` and `limit`, fetches that page, then drops the rows whose price
/// falls outside `minPrice`/`maxPrice`. The price bounds act on the fetched
/// page only: a page can come back shorter than `limit` (or empty) even when
/// later pages hold matching products, and neither count reflects them.
///
/// # Errors
///
/// Returns `ServerError::ProductsQuery` if any store query fails.
#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    summary = "List products",
    description = "Filtered, sorted and paginated product listing. `minPrice`/`maxPrice` are applied to the returned page after pagination and are not reflected in `total` or `totalFilteredProducts`. Malformed parameters are coerced, never rejected.",
    params(catalog_types::ProductQueryParams),
    responses(
        (status = 200, description = "Requested page of products", body = ProductListResponse),
        (status = 500, description = "Store query failed", body = ErrorBody,
            example = json!({"error": "Internal Server Error", "details": "connection reset by peer"}))
    )
)]
pub async fn list_products<S: ProductStore + 'static>(
    State(state): State<ServerState<S>>,
    CatalogQuery(query): CatalogQuery,
) -> Result<Json<ProductListResponse>, ServerError> {
    inc_requests("/products");

    let store = state.store();
    let everything = FilterCriteria::all();

    let page = timed(
        "find_page",
        store.find_page(query.criteria(), query.sort(), query.pagination()),
    )
    .await
    .map_err(|source| ServerError::ProductsQuery { source })?;

    let total = timed("count", store.count(&everything))
        .await
        .map_err(|source| ServerError::ProductsQuery { source })?;

    let total_filtered_products = timed("count", store.count(query.criteria()))
        .await
        .map_err(|source| ServerError::ProductsQuery { source })?;

    let fetched = page.len();
    let data = query.price().apply(page);

    debug!(
        fetched,
        returned = data.len(),
        total,
        total_filtered_products,
        "served product page"
    );

    Ok(Json(ProductListResponse {
        data,
        total,
        total_filtered_products,
    }))
}

/// List distinct brands
///
/// # Errors
///
/// Returns `ServerError::FacetQuery` if the grouping query fails.
#[utoipa::path(
    get,
    path = "/brands",
    tag = "catalog",
    summary = "List brands",
    description = "Distinct `brand` values across the catalog, in store grouping order.",
    responses(
        (status = 200, description = "Distinct brands", body = [String], example = json!(["Apple", "Google"])),
        (status = 500, description = "Store query failed", body = ErrorBody,
            example = json!({"error": "Internal Server Error"}))
    )
)]
pub async fn list_brands<S: ProductStore + 'static>(
    State(state): State<ServerState<S>>,
) -> Result<Json<Vec<Value>>, ServerError> {
    facet_values(&state, FacetField::Brand).await.map(Json)
}

/// List distinct categories
///
/// # Errors
///
/// Returns `ServerError::FacetQuery` if the grouping query fails.
#[utoipa::path(
    get,
    path = "/categories",
    tag = "catalog",
    summary = "List categories",
    description = "Distinct `category` values across the catalog, in store grouping order.",
    responses(
        (status = 200, description = "Distinct categories", body = [String], example = json!(["Phones", "Laptops"])),
        (status = 500, description = "Store query failed", body = ErrorBody,
            example = json!({"error": "Internal Server Error"}))
    )
)]
pub async fn list_categories<S: ProductStore + 'static>(
    State(state): State<ServerState<S>>,
) -> Result<Json<Vec<Value>>, ServerError> {
    facet_values(&state, FacetField::Category).await.map(Json)
}

async fn facet_values<S: ProductStore>(
    state: &ServerState<S>,
    facet: FacetField,
) -> Result<Vec<Value>, ServerError> {
    inc_requests(match facet {
        FacetField::Brand => "/brands",
        FacetField::Category => "/categories",
    });

    let values = timed("distinct_values", state.store().distinct_values(facet))
        .await
        .map_err(|source| ServerError::FacetQuery { facet, source })?;

    debug!(facet = %facet, count = values.len(), "served facet values");
    Ok(values)
}
