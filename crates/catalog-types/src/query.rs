// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Product query construction
//!
//! [`ProductQuery::from_params`] turns the raw, untrusted query string values
//! of a listing request into an immutable query description:
//!
//! - [`FilterCriteria`]: the store-side filter (name pattern, category, brand)
//! - [`SortSpec`]: optional single-field ordering
//! - [`Pagination`]: skip/limit window
//! - [`PriceRange`]: bounds applied in-process to the page the store returned
//!
//! Nothing here rejects input. Missing, empty and malformed values fall back
//! to defaults or drop the constraint they would have expressed.
//!
//! The price bounds are deliberately not part of [`FilterCriteria`]: they are
//! evaluated after skip/limit on the already-fetched page, so a page may hold
//! fewer than `limit` rows and the reported counts ignore them.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::{
    coerce::{parse_float_prefix, parse_int_prefix},
    product::Product,
};

/// Page number used when `page` is missing or not a number
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when `limit` is missing or not a number
pub const DEFAULT_LIMIT: u64 = 10;

/// Raw query string parameters of `GET /products`
///
/// Every value is kept as text; coercion happens in [`ProductQuery::from_params`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQueryParams {
    /// Case-insensitive pattern matched against the product name
    pub search: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Exact brand
    pub brand: Option<String>,
    /// Lower price bound, applied to the returned page only
    pub min_price: Option<String>,
    /// Upper price bound, applied to the returned page only
    pub max_price: Option<String>,
    /// Sort order as `field-asc` or `field-desc`
    #[param(example = "price-desc")]
    pub sort_by: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 10)
    pub limit: Option<String>,
}

impl ProductQueryParams {
    /// Collect parameters from decoded `key=value` pairs
    ///
    /// Unknown keys are ignored. When a key repeats, the first occurrence wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "search" => &mut params.search,
                "category" => &mut params.category,
                "brand" => &mut params.brand,
                "minPrice" => &mut params.min_price,
                "maxPrice" => &mut params.max_price,
                "sortBy" => &mut params.sort_by,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

/// Store-side filter for product listings
///
/// Each present constraint narrows the result (logical AND). The default
/// value matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    name_pattern: Option<String>,
    category: Option<String>,
    brand: Option<String>,
}

impl FilterCriteria {
    /// Criteria matching every product
    pub fn all() -> Self {
        Self::default()
    }

    /// Build criteria from optional constraints; empty strings impose nothing
    pub fn new(
        name_pattern: Option<String>,
        category: Option<String>,
        brand: Option<String>,
    ) -> Self {
        Self {
            name_pattern: non_empty(name_pattern),
            category: non_empty(category),
            brand: non_empty(brand),
        }
    }

    /// Case-insensitive regular expression the product name must match
    pub fn name_pattern(&self) -> Option<&str> {
        self.name_pattern.as_deref()
    }

    /// Exact category the product must have
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Exact brand the product must have
    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    /// Whether no constraint is present
    pub fn is_unconstrained(&self) -> bool {
        self.name_pattern.is_none() && self.category.is_none() && self.brand.is_none()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Store sort key value (`1` or `-1`)
    pub const fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Single-field ordering parsed from `sortBy`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    field: String,
    direction: SortDirection,
}

impl SortSpec {
    /// Create a sort on `field`
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Parse `field-direction`
    ///
    /// The text is split on the first `-`. A right-hand side of exactly
    /// `desc` sorts descending, anything else (or no `-` at all) ascending.
    /// Empty input means no explicit sort.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let (field, direction) = raw.split_once('-').unwrap_or((raw, ""));
        let direction = if direction == "desc" {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        Some(Self::new(field, direction))
    }

    /// Field to sort on
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Sort direction
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}-{direction}", self.field)
    }
}

/// Skip/limit window over the filtered, sorted product list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Create a window; `page` is clamped to at least 1
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Coerce raw `page`/`limit` text
    ///
    /// Values without an integer prefix fall back to the defaults. Pages below
    /// 1 are clamped to 1 and a negative limit uses its magnitude. A limit of
    /// 0 means no row cap, matching the document store's `limit(0)`.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(parse_int_prefix)
            .map_or(DEFAULT_PAGE, |p| u64::try_from(p).unwrap_or(0));
        let limit = limit
            .and_then(parse_int_prefix)
            .map_or(DEFAULT_LIMIT, i64::unsigned_abs);
        Self::new(page, limit)
    }

    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Number of documents skipped: `(page - 1) * limit`
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Row cap, `None` when uncapped
    pub fn limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }
}

/// Inclusive price bounds applied to an already-fetched page
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl PriceRange {
    /// Create bounds from already-parsed values
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.filter(|v| !v.is_nan()),
            max: max.filter(|v| !v.is_nan()),
        }
    }

    /// Coerce raw `minPrice`/`maxPrice` text; unparsable bounds are dropped
    pub fn from_raw(min: Option<&str>, max: Option<&str>) -> Self {
        Self::new(
            min.and_then(parse_float_prefix),
            max.and_then(parse_float_prefix),
        )
    }

    /// Lower bound
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Whether any bound is present
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether `product` falls inside the bounds
    ///
    /// Without bounds every product passes. With any bound, a product whose
    /// price cannot be read is outside the range.
    pub fn contains(&self, product: &Product) -> bool {
        if !self.is_bounded() {
            return true;
        }
        let Some(price) = product.price() else {
            return false;
        };
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }

    /// Drop the products outside the bounds, preserving order
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        if !self.is_bounded() {
            return products;
        }
        products.into_iter().filter(|p| self.contains(p)).collect()
    }
}

/// Fully coerced product listing query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    criteria: FilterCriteria,
    sort: Option<SortSpec>,
    pagination: Pagination,
    price: PriceRange,
}

impl ProductQuery {
    /// Build the query for a `GET /products` request
    pub fn from_params(params: &ProductQueryParams) -> Self {
        Self {
            criteria: FilterCriteria::new(
                params.search.clone(),
                params.category.clone(),
                params.brand.clone(),
            ),
            sort: params.sort_by.as_deref().and_then(SortSpec::parse),
            pagination: Pagination::from_raw(params.page.as_deref(), params.limit.as_deref()),
            price: PriceRange::from_raw(params.min_price.as_deref(), params.max_price.as_deref()),
        }
    }

    /// Store-side filter
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Optional ordering
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Skip/limit window
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// In-process price bounds
    pub fn price(&self) -> PriceRange {
        self.price
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
