// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Catalog server
//!
//! Wires a product store into the router, stacks the request middleware and
//! runs the listener until a `CancellationToken` is cancelled.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, body::Body, http::HeaderName, middleware::from_fn_with_state};
use hyper::Request;
use mongo_store::MongoProductStore;
use store_client::ProductStore;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{Span, error, info, info_span, warn};

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
    middleware::{OriginAllowList, origin_guard},
    routes::create_routes,
    state::ServerState,
};

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// How long shutdown waits for open requests
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// Maximum time in-flight requests get to finish once shutdown starts
    pub graceful_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            graceful_timeout: DRAIN_TIMEOUT,
        }
    }
}

/// Catalog HTTP server over a [`ProductStore`]
#[derive(Debug)]
pub struct Server<S> {
    config: ServerConfig,
    router: Router,
    state: ServerState<S>,
    /// Root token; handler state holds a child of it
    cancellation_token: CancellationToken,
    shutdown_config: ShutdownConfig,
}

impl Server<MongoProductStore> {
    /// Connect to the configured MongoDB deployment and build the server
    ///
    /// Nothing is bound yet; the listener is only opened by [`Server::run`],
    /// so a failed connection means the process never listens.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::StoreConnection` if the store cannot be reached, or
    /// `ServerError::Config` if the configuration is invalid.
    pub async fn connect(config: ServerConfig, shutdown_config: ShutdownConfig) -> ServerResult<Self> {
        let store = MongoProductStore::connect(&config.store)
            .await
            .map_err(|source| ServerError::StoreConnection { source })?;
        Self::with_store(config, shutdown_config, Arc::new(store))
    }
}

/// Span for one request, keyed by the id set in the layer above
fn request_span(req: &Request<Body>) -> Span {
    match req.headers().get(REQUEST_ID) {
        Some(request_id) => {
            info_span!("http_request", ?request_id, method = %req.method(), uri = %req.uri())
        }
        None => {
            error!("request reached tracing without an id");
            info_span!("http_request", request_id = "unknown", method = %req.method(), uri = %req.uri())
        }
    }
}

impl<S: ProductStore + 'static> Server<S> {
    /// Build a server over an existing store
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` when an allowed origin is not a valid
    /// header value.
    pub fn with_store(
        config: ServerConfig,
        shutdown_config: ShutdownConfig,
        store: Arc<S>,
    ) -> ServerResult<Self> {
        let allow_list = OriginAllowList::new(&config.cors.allowed_origins)?;
        if allow_list.is_empty() {
            warn!("no allowed origins configured, every browser request will be rejected");
        }

        let cancellation_token = CancellationToken::new();
        let state = ServerState::new(config.clone(), store, cancellation_token.child_token());
        let router = Self::create_router(state.clone(), &allow_list);

        Ok(Self {
            config,
            router,
            state,
            cancellation_token,
            shutdown_config,
        })
    }

    /// Request id, tracing, origin guard and CORS, outermost first
    fn create_router(state: ServerState<S>, allow_list: &OriginAllowList) -> Router {
        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(PropagateRequestIdLayer::new(REQUEST_ID))
            .layer(from_fn_with_state(allow_list.clone(), origin_guard))
            .layer(allow_list.cors_layer());

        create_routes::<S>().layer(layers).with_state(state)
    }

    async fn bind(&self) -> ServerResult<(TcpListener, SocketAddr)> {
        let address = self.config.socket_addr();
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;
        let bound = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;
        Ok((listener, bound))
    }

    /// Serve until a signal or [`Server::shutdown`], then drain
    ///
    /// Open requests get [`ShutdownConfig::graceful_timeout`] to finish before
    /// the serve task is aborted.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` or `ServerError::Startup` when the listener
    /// cannot be opened, and `ServerError::Shutdown` if serving ends with an
    /// IO error.
    pub async fn run(self) -> ServerResult<()> {
        let (listener, bound) = self.bind().await?;
        info!(
            address = %bound,
            environment = %self.config.environment,
            store = self.state.store().name(),
            "catalog server listening",
        );

        let token = self.cancellation_token;
        tokio::spawn(Self::shutdown_signal_handler(token.clone()));

        let serve_token = token.clone();
        let router = self.router;
        let mut serving = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { serve_token.cancelled().await })
                .await
        });

        let drain = self.shutdown_config.graceful_timeout;
        let outcome = tokio::select! {
            joined = &mut serving => joined?,
            () = token.cancelled() => {
                info!(timeout = ?drain, "draining in-flight requests");
                match tokio::time::timeout(drain, &mut serving).await {
                    Ok(joined) => joined?,
                    Err(_) => {
                        warn!("drain timed out, dropping open connections");
                        serving.abort();
                        Ok(())
                    }
                }
            }
        };

        outcome.map_err(|source| {
            error!(error = ?source, "catalog server stopped with an error");
            ServerError::Shutdown { source }
        })?;
        info!("catalog server shut down gracefully");
        Ok(())
    }

    /// Cancel `token` on SIGINT or SIGTERM (Ctrl+C off unix)
    async fn shutdown_signal_handler(token: CancellationToken) {
        let signal_received = async {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let (mut sigterm, mut sigint) =
                    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                        (Err(e), _) | (_, Err(e)) => {
                            error!(error = %e, "failed to register signal handlers");
                            return std::future::pending::<&str>().await;
                        }
                    };

                tokio::select! {
                    _ = sigterm.recv() => "SIGTERM",
                    _ = sigint.recv() => "SIGINT",
                }
            }

            #[cfg(not(unix))]
            {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "failed to install Ctrl+C handler");
                    return std::future::pending::<&str>().await;
                }
                "Ctrl+C"
            }
        };

        tokio::select! {
            signal_name = signal_received => {
                warn!(signal = signal_name, "shutdown signal received");
                token.cancel();
            },
            () = token.cancelled() => {
                info!("shutdown already under way, signal handler exiting");
            }
        }
    }

    /// Root cancellation token
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Cancel the root token, which starts the drain in [`Server::run`]
    pub fn shutdown(&self) {
        info!("programmatic shutdown requested");
        self.cancellation_token.cancel();
    }

    /// Serve in the background and return the bound address
    ///
    /// Cancelling the returned token stops serving. No signal handler and no
    /// drain timeout are installed.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` or `ServerError::Startup` when the listener
    /// cannot be opened.
    pub async fn run_for_testing(self) -> ServerResult<(SocketAddr, CancellationToken)> {
        let (listener, bound) = self.bind().await?;

        let token = self.cancellation_token.child_token();
        let stop = token.clone();
        let router = self.router;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await
            {
                error!(error = %e, "test server stopped with an error");
            }
        });

        Ok((bound, token))
    }

    /// Configuration the server was built with
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Shared handler state
    pub fn state(&self) -> &ServerState<S> {
        &self.state
    }
}
