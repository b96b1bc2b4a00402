// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Product documents
//!
//! The catalog does not own the product schema. A [`Product`] is the stored
//! document as-is, with typed accessors for the handful of fields the query
//! layer reads (`name`, `category`, `brand`, `price`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::coerce::parse_float_prefix;

/// A product document read from the catalog store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(
    value_type = Object,
    example = json!({
        "_id": "66f1c0ffee0000000000abcd",
        "name": "Pixel 9",
        "brand": "Google",
        "category": "Phones",
        "price": "799.00"
    })
)]
pub struct Product(Map<String, Value>);

impl Product {
    /// Wrap an already-decoded document
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a product from a JSON value, returning `None` for non-objects
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Raw field lookup
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Product name, if stored as a string
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// Product brand, if stored as a string
    pub fn brand(&self) -> Option<&str> {
        self.get("brand").and_then(Value::as_str)
    }

    /// Product category, if stored as a string
    pub fn category(&self) -> Option<&str> {
        self.get("category").and_then(Value::as_str)
    }

    /// Numeric price
    ///
    /// Prices are stored as decimal strings. String prices are read by their
    /// numeric prefix, numeric prices are taken as-is, and anything else
    /// (missing, null, objects) has no price.
    pub fn price(&self) -> Option<f64> {
        match self.get("price")? {
            Value::String(raw) => parse_float_prefix(raw),
            Value::Number(number) => number.as_f64(),
            _ => None,
        }
    }

    /// All stored fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the product, returning the underlying document
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(value: Value) -> Product {
        Product::from_value(value).expect("test product must be an object")
    }

    #[test]
    fn typed_accessors() {
        let p = product(json!({
            "name": "Galaxy S24",
            "brand": "Samsung",
            "category": "Phones",
            "price": "899.99",
            "stock": 4
        }));

        assert_eq!(p.name(), Some("Galaxy S24"));
        assert_eq!(p.brand(), Some("Samsung"));
        assert_eq!(p.category(), Some("Phones"));
        assert_eq!(p.price(), Some(899.99));
        assert_eq!(p.get("stock"), Some(&json!(4)));
    }

    #[test]
    fn price_variants() {
        assert_eq!(product(json!({"price": 25})).price(), Some(25.0));
        assert_eq!(product(json!({"price": "12abc"})).price(), Some(12.0));
        assert_eq!(product(json!({"price": "free"})).price(), None);
        assert_eq!(product(json!({"price": null})).price(), None);
        assert_eq!(product(json!({})).price(), None);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Product::from_value(json!("not a product")).is_none());
        assert!(Product::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn serializes_transparently() {
        let p = product(json!({"name": "A", "price": "10"}));
        assert_eq!(
            serde_json::to_value(&p).expect("serialize"),
            json!({"name": "A", "price": "10"})
        );
    }
}
