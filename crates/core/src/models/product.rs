//! Product documents.
//!
//! Products have no enforced schema: apart from the id, a product is whatever
//! fields the catalog wrote. The storefront passes them through untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ProductId;

/// A product document: its id plus arbitrary document fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Document id.
    pub id: ProductId,
    /// All other document fields, as stored.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    /// Build a product from its id and document fields.
    ///
    /// A stray `id` entry in `fields` is dropped; the document key wins.
    #[must_use]
    pub fn new(id: ProductId, mut fields: Map<String, Value>) -> Self {
        fields.remove("id");
        Self { id, fields }
    }

    /// The product's `name` field, if it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    /// The product's `price` field, if it holds a number or numeric string.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        match self.fields.get("price")? {
            Value::Number(n) => n.to_string().parse().ok(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}
