// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Per-request handler state and the `/health` payload

use std::sync::Arc;

use serde::Serialize;
use store_client::{HealthStatus, ProductStore};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::config::{Environment, ServerConfig};

/// Handler state: configuration, store handle and shutdown token
///
/// Generic over the store so tests can run the real router against an
/// in-memory or failing implementation.
#[derive(Debug)]
pub struct ServerState<S> {
    config: Arc<ServerConfig>,
    /// Read-only product store shared by every request
    store: Arc<S>,
    /// Child of the server's root token
    pub cancellation_token: CancellationToken,
}

// derived Clone would require `S: Clone`
impl<S> Clone for ServerState<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<S: ProductStore> ServerState<S> {
    /// Wrap `config` and `store` for sharing across handlers
    pub fn new(config: ServerConfig, store: Arc<S>, cancellation_token: CancellationToken) -> Self {
        Self {
            config: Arc::new(config),
            store,
            cancellation_token,
        }
    }

    /// Loaded configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Product store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Probe the store and summarize the service status
    pub async fn health_check(&self) -> HealthCheck {
        let store_status = self.store.health_check().await;

        let status = match store_status.reason() {
            Some(reason) => HealthStatus::Down {
                reason: format!("product store: {reason}"),
            },
            None => HealthStatus::Up,
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            store: StoreHealth {
                name: self.store.name(),
                status: store_status,
            },
        }
    }
}

/// Health of the product store backing the service
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    /// Store implementation name
    #[schema(value_type = String, example = "mongodb")]
    pub name: &'static str,
    /// Store status
    pub status: HealthStatus,
}

/// Body of `GET /health`
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheck {
    /// `Down` whenever the store is down
    pub status: HealthStatus,
    /// Crate version of the running binary
    #[schema(value_type = String)]
    pub version: Box<str>,
    /// Deployment environment
    #[schema(value_type = String)]
    pub environment: Environment,
    /// RFC 3339 time of the probe
    pub timestamp: String,
    /// Status of the product store
    pub store: StoreHealth,
}
