// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory product store
//!
//! Holds a fixed list of products and answers queries the way the document
//! store does: natural order is insertion order, name search is a
//! case-insensitive regular expression, sorting follows the store's
//! cross-type ordering (missing/null < numbers < strings < objects < arrays
//! < booleans), and facet grouping keeps first-seen order.

use std::{cmp::Ordering, sync::Arc};

use catalog_types::{FacetField, FilterCriteria, Pagination, Product, SortDirection, SortSpec};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::debug;

use crate::{HealthStatus, ProductStore, StoreError};

/// Product store backed by a fixed in-process list
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<[Product]>,
}

impl InMemoryProductStore {
    /// Create a store holding `products` in the given order
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().collect(),
        }
    }

    /// Create a store from JSON documents, skipping anything that is not an object
    pub fn from_documents(documents: impl IntoIterator<Item = Value>) -> Self {
        Self::new(documents.into_iter().filter_map(Product::from_value))
    }

    /// Number of stored products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the store holds no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn matching<'a>(
        &'a self,
        criteria: &'a FilterCriteria,
    ) -> Result<impl Iterator<Item = &'a Product> + 'a, StoreError> {
        let matcher = CompiledCriteria::compile(criteria)?;
        Ok(self.products.iter().filter(move |p| matcher.matches(p)))
    }
}

impl ProductStore for InMemoryProductStore {
    async fn find_page(
        &self,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        pagination: Pagination,
    ) -> Result<Vec<Product>, StoreError> {
        let mut rows: Vec<&Product> = self.matching(criteria)?.collect();

        if let Some(sort) = sort {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(sort.field()), b.get(sort.field()));
                match sort.direction() {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
        let take = pagination
            .limit()
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));

        let page: Vec<Product> = rows.into_iter().skip(skip).take(take).cloned().collect();
        debug!(rows = page.len(), skip, "served product page from memory");
        Ok(page)
    }

    async fn count(&self, criteria: &FilterCriteria) -> Result<u64, StoreError> {
        Ok(self.matching(criteria)?.count() as u64)
    }

    async fn distinct_values(&self, field: FacetField) -> Result<Vec<Value>, StoreError> {
        let mut values: Vec<Value> = Vec::new();
        for product in self.products.iter() {
            let value = product
                .get(field.field_name())
                .cloned()
                .unwrap_or(Value::Null);
            if !values.contains(&value) {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn health_check(&self) -> HealthStatus {
        HealthStatus::Up
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

struct CompiledCriteria<'a> {
    name: Option<Regex>,
    criteria: &'a FilterCriteria,
}

impl<'a> CompiledCriteria<'a> {
    fn compile(criteria: &'a FilterCriteria) -> Result<Self, StoreError> {
        let name = criteria
            .name_pattern()
            .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
            .transpose()
            .map_err(|e| StoreError::InvalidPattern {
                message: e.to_string(),
            })?;
        Ok(Self { name, criteria })
    }

    fn matches(&self, product: &Product) -> bool {
        let name_ok = self
            .name
            .as_ref()
            .is_none_or(|re| product.name().is_some_and(|name| re.is_match(name)));
        let category_ok = self
            .criteria
            .category()
            .is_none_or(|category| product.category() == Some(category));
        let brand_ok = self
            .criteria
            .brand()
            .is_none_or(|brand| product.brand() == Some(brand));

        name_ok && category_ok && brand_ok
    }
}

/// Rank of a value in the document store's cross-type sort order
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
