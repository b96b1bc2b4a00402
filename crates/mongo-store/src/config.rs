// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! MongoDB connection settings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Database holding the catalog
pub const DEFAULT_DATABASE: &str = "gadget-world";
/// Collection holding the product documents
pub const DEFAULT_COLLECTION: &str = "products";

/// Connection settings for the product collection
///
/// An empty `uri` is accepted here; it surfaces as a connection failure when
/// the store connects.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoStoreConfig {
    /// MongoDB connection string
    #[serde(default)]
    pub uri: String,
    /// Database name
    #[serde(default = "default_database")]
    pub database: String,
    /// Collection name
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for MongoStoreConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl MongoStoreConfig {
    /// Settings for `uri` with the default database and collection
    pub fn with_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Connection string with any credentials masked, safe to log
    pub fn redacted_uri(&self) -> String {
        let Some((scheme, rest)) = self.uri.split_once("://") else {
            return self.uri.clone();
        };
        let authority_end = rest.find('/').unwrap_or(rest.len());
        match rest[..authority_end].rfind('@') {
            Some(at) => format!("{scheme}://***@{}", &rest[at + 1..]),
            None => self.uri.clone(),
        }
    }
}

impl fmt::Debug for MongoStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoStoreConfig")
            .field("uri", &self.redacted_uri())
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}
