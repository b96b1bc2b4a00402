// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server and request errors
//!
//! [`ServerError`] covers both lifecycle failures (configuration, binding,
//! store connection) and request failures. Request failures are mapped to HTTP
//! responses in exactly one place, the [`IntoResponse`] implementation, which
//! also logs them. Handlers only return `Result<_, ServerError>`.
//!
//! Response bodies on the catalog routes are fixed by existing clients:
//!
//! - `/products`: `500 {"error": "Internal Server Error", "details": <message>}`
//! - `/brands`, `/categories`: `500 {"error": "Internal Server Error"}`

use std::net::SocketAddr;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catalog_types::FacetField;
use serde::Serialize;
use store_client::StoreError;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Generic message returned for every internal failure
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Everything that can fail in the catalog server
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// The product store could not be reached at startup
    #[error("Error connecting to product store: {source}")]
    StoreConnection {
        /// Underlying store error
        #[source]
        source: StoreError,
    },

    /// Listener could not be opened
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Configured listen address
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Bound listener could not report its address
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Serving ended with an IO error
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Serve task panicked or was cancelled
    #[error("Task join error: {source}")]
    TaskJoin {
        /// Underlying tokio join error
        #[source]
        source: tokio::task::JoinError,
    },

    /// A product listing query failed
    #[error("Error fetching products: {source}")]
    ProductsQuery {
        /// Underlying store error
        #[source]
        source: StoreError,
    },

    /// A facet listing query failed
    #[error("Error fetching {}: {source}", facet.plural())]
    FacetQuery {
        /// Facet being listed
        facet: FacetField,
        /// Underlying store error
        #[source]
        source: StoreError,
    },
}

/// `Result` with [`ServerError`]
pub type ServerResult<T> = Result<T, ServerError>;

/// JSON body of a failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `Internal Server Error`
    #[schema(value_type = String, example = "Internal Server Error")]
    pub error: &'static str,
    /// Store error message, present only on product listing failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    /// Body without details
    pub fn generic() -> Self {
        Self {
            error: INTERNAL_SERVER_ERROR,
            details: None,
        }
    }

    /// Body carrying the failure message
    pub fn with_details(details: impl Into<String>) -> Self {
        Self {
            error: INTERNAL_SERVER_ERROR,
            details: Some(details.into()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = match &self {
            ServerError::ProductsQuery { source } => {
                error!(error = %source, "Error fetching products");
                ErrorBody::with_details(source.to_string())
            }
            ServerError::FacetQuery { facet, source } => {
                error!(facet = %facet, error = %source, "Error fetching {}", facet.plural());
                ErrorBody::generic()
            }
            ServerError::Config { .. }
            | ServerError::StoreConnection { .. }
            | ServerError::Bind { .. }
            | ServerError::Startup { .. }
            | ServerError::Shutdown { .. }
            | ServerError::TaskJoin { .. } => {
                error!(error = %self, "internal server error");
                ErrorBody::generic()
            }
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(source: tokio::task::JoinError) -> Self {
        Self::TaskJoin { source }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn products_failure_carries_details() {
        let response = ServerError::ProductsQuery {
            source: StoreError::query("connection reset by peer"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Internal Server Error", "details": "connection reset by peer"})
        );
    }

    #[tokio::test]
    async fn facet_failure_has_no_details() {
        for facet in [FacetField::Brand, FacetField::Category] {
            let response = ServerError::FacetQuery {
                facet,
                source: StoreError::query("boom"),
            }
            .into_response();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(response).await,
                json!({"error": "Internal Server Error"})
            );
        }
    }

    #[test]
    fn facet_errors_name_the_facet() {
        let err = ServerError::FacetQuery {
            facet: FacetField::Category,
            source: StoreError::query("boom"),
        };
        assert_eq!(err.to_string(), "Error fetching categories: boom");
    }

    #[tokio::test]
    async fn lifecycle_errors_do_not_leak_messages() {
        let response = ServerError::Config {
            message: "secret path".to_string(),
        }
        .into_response();

        assert_eq!(
            body_json(response).await,
            json!({"error": "Internal Server Error"})
        );
    }
}
