// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! BSON to JSON conversion for product documents
//!
//! Object ids are rendered as their 24-character hex string, the form front
//! ends already use as product keys. Every other BSON value uses relaxed
//! extended JSON.

use catalog_types::Product;
use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// Convert a stored document into a [`Product`]
pub fn document_to_product(document: Document) -> Product {
    Product::from_fields(document_to_map(document))
}

/// Convert a single BSON value to JSON
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::Document(document) => Value::Object(document_to_map(document)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

fn document_to_map(document: Document) -> Map<String, Value> {
    document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}
