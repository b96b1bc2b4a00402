// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Gadget Catalog API Server Implementation
//!
//! This crate provides the HTTP server for the gadget catalog, built with Axum.
//! It answers three read-only queries over the product collection: a filtered,
//! sorted, paginated product listing and the distinct brand and category
//! values.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and the single place they become HTTP responses
//! - [`state`]: Shared application state holding the product store
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`extractors`]: Query string extraction that coerces instead of rejecting
//! - [`middleware`]: Origin allow-list and CORS
//! - [`metrics`]: Prometheus request and store latency metrics
//! - [`openapi`]: `OpenAPI` specification and Swagger UI endpoints for API documentation
//!
//! # Store Injection
//!
//! [`Server`] is generic over [`store_client::ProductStore`]. Production code
//! builds it with [`Server::connect`], which talks to MongoDB; tests build it
//! with [`Server::with_store`] over an in-memory or failing store and drive the
//! real router.

pub mod config;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use routes::handlers::ProductListResponse;
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, ServerState};
