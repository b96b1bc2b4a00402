// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the gadget catalog service
//!
//! This crate holds the pieces of the catalog that have no I/O: the product
//! document wrapper, the raw query parameters, and the builder that turns those
//! parameters into filter criteria, sort order, pagination and price bounds.
//! Both the store implementations and the HTTP layer depend on it.

pub mod coerce;
pub mod facet;
pub mod product;
pub mod query;

pub use coerce::{parse_float_prefix, parse_int_prefix};
pub use facet::FacetField;
pub use product::Product;
pub use query::{
    FilterCriteria, Pagination, PriceRange, ProductQuery, ProductQueryParams, SortDirection,
    SortSpec,
};
