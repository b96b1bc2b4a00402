// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! MongoDB product store
//!
//! [`MongoProductStore`] implements `store_client::ProductStore` on top of a
//! single MongoDB collection. It holds one long-lived [`mongodb::Client`]
//! whose internal pool is shared by every request.
//!
//! - [`config`]: connection settings
//! - [`query`]: translation of catalog query values into BSON filters, sorts and pipelines
//! - [`convert`]: BSON document to JSON product conversion
//! - [`store`]: the store itself

pub mod config;
pub mod convert;
pub mod query;
pub mod store;

pub use config::MongoStoreConfig;
pub use store::MongoProductStore;
