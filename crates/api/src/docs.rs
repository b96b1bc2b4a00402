// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document for the catalog routes

use store_client::HealthStatus;
use utoipa::OpenApi;

use crate::{
    error::ErrorBody,
    routes::handlers::{self, ProductListResponse},
    state::{HealthCheck, StoreHealth},
};

/// Generated `OpenAPI` document
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Gadget Catalog API",
        description = "Read-only queries over the gadget product catalog: filtered product listing and brand/category facets."
    ),
    paths(
        handlers::health_handler,
        handlers::list_products,
        handlers::list_brands,
        handlers::list_categories,
    ),
    components(schemas(
        catalog_types::Product,
        ProductListResponse,
        ErrorBody,
        HealthCheck,
        StoreHealth,
        HealthStatus,
    )),
    tags(
        (name = "catalog", description = "Product listing and facets"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
