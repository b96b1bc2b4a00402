// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Gadget Catalog API Server
//!
//! Read-only HTTP queries over the gadget product catalog.

use anyhow::Result;
use api::{Server, ServerConfig, ServerError, ShutdownConfig};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gadget catalog server");

    let config = ServerConfig::from_env()?;

    // a store that cannot be reached at startup is logged and the process
    // exits without ever listening
    let server = match Server::connect(config, ShutdownConfig::default()).await {
        Ok(server) => server,
        Err(ServerError::StoreConnection { source }) => {
            error!(error = %source, "error connecting to MongoDB");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // NOTE: the `#[tokio::main]` task does not run a worker future, we must spawn
    tokio::spawn(async move { server.run().await }).await??;

    Ok(())
}
