// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! MongoDB implementation of `ProductStore`

use catalog_types::{FacetField, FilterCriteria, Pagination, Product, SortSpec};
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Document, doc},
    error::{Error as MongoError, ErrorKind},
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use serde_json::Value;
use store_client::{HealthStatus, ProductStore, StoreError};
use tracing::{debug, info, instrument};

use crate::{
    config::MongoStoreConfig,
    convert::{bson_to_json, document_to_product},
    query::{facet_pipeline, filter_document, sort_document},
};

const APP_NAME: &str = "gadget-catalog";

/// Product store backed by one MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoProductStore {
    client: Client,
    database: String,
    collection: Collection<Document>,
}

impl MongoProductStore {
    /// Connect to MongoDB and verify the deployment answers a `ping`
    ///
    /// The client pins Stable API version 1 in strict mode. Nothing is retried:
    /// a failed parse, handshake or ping is returned as
    /// [`StoreError::Connection`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if the URI is invalid or the deployment
    /// cannot be reached.
    pub async fn connect(config: &MongoStoreConfig) -> Result<Self, StoreError> {
        info!(
            uri = %config.redacted_uri(),
            database = %config.database,
            collection = %config.collection,
            "connecting to MongoDB"
        );

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client =
            Client::with_options(options).map_err(|e| StoreError::connection(e.to_string()))?;
        let store = Self::from_client(client, config);

        store
            .ping()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!("connected to MongoDB");
        Ok(store)
    }

    /// Wrap an existing client without contacting the deployment
    pub fn from_client(client: Client, config: &MongoStoreConfig) -> Self {
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);
        Self {
            client,
            database: config.database.clone(),
            collection,
        }
    }

    /// Underlying collection handle
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    async fn ping(&self) -> Result<(), MongoError> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
    }
}

impl ProductStore for MongoProductStore {
    #[instrument(skip(self))]
    async fn find_page(
        &self,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        pagination: Pagination,
    ) -> Result<Vec<Product>, StoreError> {
        let mut find = self
            .collection
            .find(filter_document(criteria))
            .skip(pagination.skip());

        if let Some(sort) = sort {
            find = find.sort(sort_document(sort));
        }

        if let Some(limit) = pagination.limit() {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let cursor = find.await.map_err(query_error)?;
        let documents: Vec<Document> = cursor.try_collect().await.map_err(query_error)?;

        debug!(rows = documents.len(), "fetched product page");
        Ok(documents.into_iter().map(document_to_product).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, criteria: &FilterCriteria) -> Result<u64, StoreError> {
        self.collection
            .count_documents(filter_document(criteria))
            .await
            .map_err(query_error)
    }

    #[instrument(skip(self))]
    async fn distinct_values(&self, field: FacetField) -> Result<Vec<Value>, StoreError> {
        let cursor = self
            .collection
            .aggregate(facet_pipeline(field))
            .await
            .map_err(query_error)?;
        let groups: Vec<Document> = cursor.try_collect().await.map_err(query_error)?;

        Ok(groups
            .into_iter()
            .map(|mut group| {
                group
                    .remove(field.field_name())
                    .map_or(Value::Null, bson_to_json)
            })
            .collect())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.ping().await {
            Ok(()) => HealthStatus::Up,
            Err(e) => HealthStatus::Down {
                reason: e.to_string(),
            },
        }
    }

    fn name(&self) -> &'static str {
        "mongodb"
    }
}

/// Map a driver error to a query failure, keeping only the server's message
/// when the server rejected the command
fn query_error(error: MongoError) -> StoreError {
    match error.kind.as_ref() {
        ErrorKind::Command(command) => StoreError::query(command.message.clone()),
        _ => StoreError::query(error.to_string()),
    }
}
