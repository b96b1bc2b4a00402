// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Product store abstraction for the gadget catalog
//!
//! The HTTP layer never talks to a database directly. It holds a value
//! implementing [`ProductStore`] and asks it for pages, counts and facet
//! values. The production implementation lives in the `mongo-store` crate;
//! [`InMemoryProductStore`] serves tests and local demos.
//!
//! # Core Abstractions
//!
//! - **`ProductStore` Trait**: read-only catalog queries with native async methods
//! - **`StoreError`**: failure taxonomy shared by every store implementation
//! - **Health Check System**: `Up`/`Down` status for the `/health` route

use catalog_types::{FacetField, FilterCriteria, Pagination, Product, SortSpec};
use serde_json::Value;
use thiserror::Error;

pub mod health;
pub mod memory;

pub use health::HealthStatus;
pub use memory::InMemoryProductStore;

/// Read-only access to the product collection
///
/// Implementations must be safe to share between concurrently running
/// requests; none of the operations mutate the collection.
pub trait ProductStore: Send + Sync {
    /// Fetch one page of products
    ///
    /// Applies `criteria`, then `sort` (store natural order when `None`), then
    /// skips `pagination.skip()` documents and returns at most
    /// `pagination.limit()` of the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be built or executed, including an
    /// invalid name pattern.
    fn find_page(
        &self,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        pagination: Pagination,
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Count the products matching `criteria`, ignoring pagination
    ///
    /// # Errors
    ///
    /// Returns an error if the count cannot be executed.
    fn count(
        &self,
        criteria: &FilterCriteria,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Distinct values of `field` across the whole collection
    ///
    /// Values are returned in the store's grouping order. Products without the
    /// field contribute a single `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grouping cannot be executed.
    fn distinct_values(
        &self,
        field: FacetField,
    ) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send;

    /// Check whether the store is reachable
    fn health_check(&self) -> impl Future<Output = HealthStatus> + Send;

    /// Short name of this store implementation
    fn name(&self) -> &'static str;
}

/// Errors reported by product stores
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    /// The store could not be reached or the connection was rejected
    #[error("failed to connect to product store: {message}")]
    Connection { message: String },

    /// A query was rejected or failed while executing
    #[error("{message}")]
    Query { message: String },

    /// The name search pattern is not a valid regular expression
    #[error("invalid search pattern: {message}")]
    InvalidPattern { message: String },

    /// The store is temporarily unable to serve requests
    #[error("product store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Wrap a query failure
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Wrap a connection failure
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_display_the_store_message_verbatim() {
        let err = StoreError::query("unknown operator: $foo");
        assert_eq!(err.to_string(), "unknown operator: $foo");
    }

    #[test]
    fn connection_errors_are_prefixed() {
        let err = StoreError::connection("no servers available");
        assert_eq!(
            err.to_string(),
            "failed to connect to product store: no servers available"
        );
    }
}
