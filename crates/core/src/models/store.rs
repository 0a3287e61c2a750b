//! Seller store documents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{StoreId, StoreStatus, UserId};

/// A seller's store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Document id.
    pub id: StoreId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub owner_id: UserId,
    pub status: StoreStatus,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub contact_info: ContactInfo,
    pub settings: StoreSettings,
    pub total_products: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public contact details for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Per-store feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoreSettings {
    pub shipping_enabled: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_store_nested_documents() {
        let store: Store = serde_json::from_value(json!({
            "id": "s1",
            "name": "Corner Shop",
            "description": "Everyday goods",
            "ownerId": "user-1",
            "status": "suspended",
            "address": "2 High St",
            "city": "Shelbyville",
            "phone": "555-0100",
            "contactInfo": {"email": "hi@corner.example", "phone": "555-0101", "address": "2 High St"},
            "settings": {"shippingEnabled": true},
            "totalProducts": 12,
            "totalSales": 1520.75,
            "rating": 4.6,
            "createdAt": "2023-11-01T00:00:00Z",
            "updatedAt": "2024-01-15T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(store.status, StoreStatus::Suspended);
        assert!(store.settings.shipping_enabled);
        assert_eq!(store.contact_info.email, "hi@corner.example");
        assert_eq!(store.total_sales, Decimal::new(152_075, 2));
        assert!(store.logo.is_none());
    }

    #[test]
    fn test_store_rejects_unknown_status() {
        let result = serde_json::from_value::<StoreStatus>(json!("closed"));
        assert!(result.is_err());
    }
}
