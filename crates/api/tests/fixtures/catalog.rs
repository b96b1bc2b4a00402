// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(dead_code)]

//! Catalog fixtures
//!
//! Provides product data, failing stores, and server startup helpers.

use std::{net::SocketAddr, sync::Arc};

use api::{Server, ServerConfig, ShutdownConfig};
use catalog_types::{FacetField, FilterCriteria, Pagination, Product, SortSpec};
use serde_json::{Value, json};
use store_client::{HealthStatus, InMemoryProductStore, ProductStore, StoreError};
use tokio_util::sync::CancellationToken;

/// Store error message used by [`FailingStore`]
pub const STORE_FAILURE: &str = "connection pool cleared";

/// Running test server
#[derive(Debug)]
pub struct TestServer {
    /// Bound address
    pub addr: SocketAddr,
    /// Cancels the server when dropped or cancelled
    pub token: CancellationToken,
}

impl TestServer {
    /// Absolute URL for `path_and_query`
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start the real router over `store` on an ephemeral port
pub async fn start_server<S: ProductStore + 'static>(store: S) -> TestServer {
    let (addr, token) = Server::with_store(
        ServerConfig::for_testing(),
        ShutdownConfig::default(),
        Arc::new(store),
    )
    .expect("Failed to create server")
    .run_for_testing()
    .await
    .expect("Failed to start test server");

    TestServer { addr, token }
}

/// Twelve gadgets with string prices, as the catalog stores them
pub fn gadget_documents() -> Vec<Value> {
    vec![
        json!({"_id": "p01", "name": "iPhone 15", "brand": "Apple", "category": "Phones", "price": "799"}),
        json!({"_id": "p02", "name": "MacBook Air", "brand": "Apple", "category": "Laptops", "price": "1099"}),
        json!({"_id": "p03", "name": "Pixel 9", "brand": "Google", "category": "Phones", "price": "699"}),
        json!({"_id": "p04", "name": "ThinkPad X1", "brand": "Lenovo", "category": "Laptops", "price": "1399"}),
        json!({"_id": "p05", "name": "Pixel Buds Pro", "brand": "Google", "category": "Audio", "price": "199"}),
        json!({"_id": "p06", "name": "Galaxy S24", "brand": "Samsung", "category": "Phones", "price": "899"}),
        json!({"_id": "p07", "name": "Galaxy Tab S9", "brand": "Samsung", "category": "Tablets", "price": "649"}),
        json!({"_id": "p08", "name": "iPad Air", "brand": "Apple", "category": "Tablets", "price": "599"}),
        json!({"_id": "p09", "name": "AirPods Pro", "brand": "Apple", "category": "Audio", "price": "249"}),
        json!({"_id": "p10", "name": "WH-1000XM5", "brand": "Sony", "category": "Audio", "price": "399"}),
        json!({"_id": "p11", "name": "Xperia 1 V", "brand": "Sony", "category": "Phones", "price": "1199"}),
        json!({"_id": "p12", "name": "Yoga Slim 7", "brand": "Lenovo", "category": "Laptops", "price": "949"}),
    ]
}

/// Store holding [`gadget_documents`]
pub fn gadget_store() -> InMemoryProductStore {
    InMemoryProductStore::from_documents(gadget_documents())
}

/// Two products: A (brand X, category C1, price "10") and B (brand Y, C2, "20")
pub fn two_product_store() -> InMemoryProductStore {
    InMemoryProductStore::from_documents([
        json!({"name": "A", "brand": "X", "category": "C1", "price": "10"}),
        json!({"name": "B", "brand": "Y", "category": "C2", "price": "20"}),
    ])
}

/// Store whose every query fails with [`STORE_FAILURE`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl ProductStore for FailingStore {
    async fn find_page(
        &self,
        _criteria: &FilterCriteria,
        _sort: Option<&SortSpec>,
        _pagination: Pagination,
    ) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::query(STORE_FAILURE))
    }

    async fn count(&self, _criteria: &FilterCriteria) -> Result<u64, StoreError> {
        Err(StoreError::query(STORE_FAILURE))
    }

    async fn distinct_values(&self, _field: FacetField) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::query(STORE_FAILURE))
    }

    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Down {
            reason: STORE_FAILURE.to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Store that serves pages but fails to count, to show a late failure is
/// still a 500 and never a partial answer
#[derive(Debug, Clone, Default)]
pub struct CountFailingStore {
    inner: InMemoryProductStore,
}

impl CountFailingStore {
    /// Wrap [`gadget_store`]
    pub fn new() -> Self {
        Self {
            inner: gadget_store(),
        }
    }
}

impl ProductStore for CountFailingStore {
    async fn find_page(
        &self,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        pagination: Pagination,
    ) -> Result<Vec<Product>, StoreError> {
        self.inner.find_page(criteria, sort, pagination).await
    }

    async fn count(&self, _criteria: &FilterCriteria) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable {
            message: "count timed out".to_string(),
        })
    }

    async fn distinct_values(&self, field: FacetField) -> Result<Vec<Value>, StoreError> {
        self.inner.distinct_values(field).await
    }

    async fn health_check(&self) -> HealthStatus {
        self.inner.health_check().await
    }

    fn name(&self) -> &'static str {
        "count-failing"
    }
}

/// Names of the products in a `/products` response body
pub fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|p| p["name"].as_str().expect("name").to_string())
        .collect()
}
