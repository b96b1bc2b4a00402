// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the catalog server.

pub mod handlers;

use axum::{Router, routing::get};
use handlers::{health_handler, list_brands, list_categories, list_products};
use store_client::ProductStore;

use crate::{
    metrics::metrics_handler,
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes
pub fn create_routes<S: ProductStore + 'static>() -> Router<ServerState<S>> {
    let health_routes = Router::new()
        .route("/health", get(health_handler::<S>))
        .route("/metrics", get(metrics_handler));

    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    let catalog_routes = Router::new()
        .route("/products", get(list_products::<S>))
        .route("/brands", get(list_brands::<S>))
        .route("/categories", get(list_categories::<S>));

    Router::new()
        .merge(health_routes)
        .merge(docs_routes)
        .merge(catalog_routes)
}
