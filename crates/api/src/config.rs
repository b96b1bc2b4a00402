// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Layered configuration for the catalog server
//!
//! Covers the listen address, the deployment environment, the MongoDB
//! connection and the browser origin allow-list.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Result, anyhow};
use config::{Config, ConfigError, Environment as ConfigEnv, File};
use mongo_store::MongoStoreConfig;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ServerError, ServerResult};

/// Port used when neither `PORT` nor `SERVER_PORT` is set
pub const DEFAULT_PORT: u16 = 4549;

/// Origins allowed to call the API from a browser
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "https://gadget-world-client.vercel.app",
];

/// Listen port, checked against the environment it runs in
///
/// Port 0 asks the OS for an ephemeral port and is only accepted when testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Validate `port` for `environment`
    ///
    /// # Errors
    ///
    /// Returns an error for port 0 outside [`Environment::Testing`]
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        match (port, environment) {
            (0, Environment::Testing) | (1.., _) => Ok(Self { port, environment }),
            (0, other) => Err(anyhow!(
                "an ephemeral port is only allowed when testing, not in {other}"
            )),
        }
    }

    /// [`DEFAULT_PORT`] in development
    pub const fn catalog_default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: Environment::Development,
        }
    }

    /// Ephemeral port for tests
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Port number
    pub fn value(&self) -> u16 {
        self.port
    }

    /// Environment the port was validated for
    pub fn environment(&self) -> Environment {
        self.environment
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // validated against the real environment once loading completes
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// Deployment environment, selected with `ENVIRONMENT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live deployment
    Production,
    /// Local development (default)
    Development,
    /// Automated tests; allows an ephemeral port
    Testing,
}

impl Environment {
    /// Lowercase name, as accepted in configuration
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Testing => "testing",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-origin access settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API; any other `Origin` is rejected
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.map(String::from).to_vec(),
        }
    }
}

/// Catalog server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub host: IpAddr,
    /// Listen port
    pub port: ServerPort,
    /// Deployment environment
    pub environment: Environment,
    /// Product store connection
    #[serde(default)]
    pub store: MongoStoreConfig,
    /// Cross-origin access
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: ServerPort::catalog_default(),
            environment: Environment::Development,
            store: MongoStoreConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration for the running process
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` when [`ServerConfig::load`] fails.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Merge configuration sources, later ones winning:
    ///
    /// 1. Built-in defaults
    /// 2. `config.json`, if present
    /// 3. `config.{ENVIRONMENT}.json`, if present
    /// 4. Environment variables with `SERVER_` prefix, `__` between nested keys
    ///    (`SERVER_STORE__URI`, `SERVER_CORS__ALLOWED_ORIGINS=a,b`)
    /// 5. The deployment variables `PORT` and `MONGO_URI`
    ///
    /// The store URI has no default. When it is missing the server fails at
    /// connection time, not here.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or the merged values do
    /// not describe a valid configuration.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("ENVIRONMENT").ok().map(|e| e.to_lowercase());
        let profile = environment
            .clone()
            .unwrap_or_else(|| Environment::Development.to_string());

        let merged = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("environment", "development")?
            .set_default("store.uri", "")?
            .set_default("store.database", mongo_store::config::DEFAULT_DATABASE)?
            .set_default("store.collection", mongo_store::config::DEFAULT_COLLECTION)?
            .set_default("cors.allowed_origins", DEFAULT_ALLOWED_ORIGINS.to_vec())?
            .add_source(File::with_name("config.json").required(false))
            .add_source(File::with_name(&format!("config.{profile}.json")).required(false))
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("port", std::env::var("PORT").ok())?
            .set_override_option("store.uri", std::env::var("MONGO_URI").ok())?
            .set_override_option("environment", environment)?
            .build()?;

        let mut config: Self = merged.try_deserialize()?;
        config.port = ServerPort::new(config.port.value(), config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port: {e}")))?;

        Ok(config)
    }

    /// Loopback, ephemeral port, default store and origins
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(),
            environment: Environment::Testing,
            store: MongoStoreConfig::default(),
            cors: CorsConfig::default(),
        }
    }

    /// Address to bind
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}
