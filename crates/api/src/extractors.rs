// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Custom extractors for catalog query strings
//!
//! Catalog routes never reject a request because of its query string. Axum's
//! `Query<T>` would answer 400 on a malformed value, so [`CatalogQuery`]
//! collects raw key/value pairs instead and leaves coercion to
//! [`ProductQuery::from_params`].

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use catalog_types::{ProductQuery, ProductQueryParams};
use tracing::debug;

/// Query string of a `/products` request, already coerced into a [`ProductQuery`]
#[derive(Debug, Clone)]
pub struct CatalogQuery(pub ProductQuery);

impl<S> FromRequestParts<S> for CatalogQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = raw_params(parts);
        Ok(CatalogQuery(ProductQuery::from_params(&params)))
    }
}

/// Recognised parameters of the request, ignoring unknown keys and keeping
/// the first occurrence of repeated ones
fn raw_params(parts: &Parts) -> ProductQueryParams {
    match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
        Ok(Query(pairs)) => ProductQueryParams::from_pairs(pairs),
        Err(rejection) => {
            debug!(error = %rejection, "unparsable query string, using defaults");
            ProductQueryParams::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use catalog_types::{Pagination, PriceRange, SortDirection};

    use super::*;

    async fn extract(uri: &str) -> ProductQuery {
        let (mut parts, ()) = Request::builder()
            .uri(uri)
            .body(())
            .expect("request")
            .into_parts();
        let CatalogQuery(query) = CatalogQuery::from_request_parts(&mut parts, &())
            .await
            .unwrap_or_else(|never| match never {});
        query
    }

    #[tokio::test]
    async fn no_query_string_uses_defaults() {
        let query = extract("/products").await;

        assert!(query.criteria().is_unconstrained());
        assert!(query.sort().is_none());
        assert_eq!(query.pagination(), Pagination::default());
        assert!(!query.price().is_bounded());
    }

    #[tokio::test]
    async fn recognised_parameters_are_coerced() {
        let query = extract(
            "/products?search=pix&brand=Google&category=Phones&sortBy=price-desc&page=2&limit=5&minPrice=100&maxPrice=900.5",
        )
        .await;

        assert_eq!(query.criteria().name_pattern(), Some("pix"));
        assert_eq!(query.criteria().brand(), Some("Google"));
        assert_eq!(query.criteria().category(), Some("Phones"));

        let sort = query.sort().expect("sort");
        assert_eq!(sort.field(), "price");
        assert_eq!(sort.direction(), SortDirection::Descending);

        assert_eq!(query.pagination(), Pagination::new(2, 5));
        assert_eq!(query.price(), PriceRange::new(Some(100.0), Some(900.5)));
    }

    #[tokio::test]
    async fn garbage_values_fall_back_instead_of_rejecting() {
        let query = extract("/products?page=abc&limit=&minPrice=cheap").await;

        assert_eq!(query.pagination(), Pagination::default());
        assert!(!query.price().is_bounded());
    }

    #[tokio::test]
    async fn percent_encoded_values_are_decoded() {
        let query = extract("/products?search=mac%20book&brand=Bang%20%26%20Olufsen").await;

        assert_eq!(query.criteria().name_pattern(), Some("mac book"));
        assert_eq!(query.criteria().brand(), Some("Bang & Olufsen"));
    }

    #[tokio::test]
    async fn first_repeated_parameter_wins() {
        let query = extract("/products?brand=Apple&brand=Google").await;
        assert_eq!(query.criteria().brand(), Some("Apple"));
    }
}
