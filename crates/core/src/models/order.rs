//! Order documents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OrderId, OrderStatus, PaymentStatus, UserId};

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document id.
    pub id: OrderId,
    /// Human-facing order number shown to the customer.
    pub order_id: String,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    /// Line items, in the order they were added.
    pub items: Vec<OrderItem>,
    /// Owner of the order.
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_info: Option<DeliveryInfo>,
    /// Payment provider's payment identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    /// Payment provider's collection identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product id of the purchased item.
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_url: Option<String>,
}

/// Where and how an order is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub delivery_method: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_order_reads_stored_document() {
        let order: Order = serde_json::from_value(json!({
            "id": "o1",
            "orderId": "ORD-1001",
            "status": "processing",
            "total": 45.5,
            "createdAt": "2024-03-01T10:00:00Z",
            "items": [
                {"id": "tee-01", "name": "Basic Tee", "price": 15.5, "quantity": 1, "totalPrice": 15.5},
                {"id": "mug-02", "name": "Mug", "price": 15, "quantity": 2, "totalPrice": 30, "srcUrl": "/img/mug.png"}
            ],
            "userId": "user-7",
            "deliveryInfo": {
                "address": "1 Main St",
                "city": "Springfield",
                "postalCode": "12345",
                "deliveryMethod": "courier"
            },
            "paymentStatus": "paid"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.total, Decimal::new(455, 1));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].src_url.as_deref(), Some("/img/mug.png"));
        assert_eq!(order.payment_status, Some(PaymentStatus::Paid));
        assert!(order.updated_at.is_none());
    }

    #[test]
    fn test_order_omits_absent_optionals() {
        let order = Order {
            id: OrderId::new("o2"),
            order_id: "ORD-1002".to_owned(),
            status: OrderStatus::Pending,
            total: Decimal::new(1000, 2),
            created_at: "2024-03-02T08:30:00Z".parse().unwrap(),
            items: Vec::new(),
            user_id: UserId::new("user-7"),
            delivery_info: None,
            payment_id: None,
            collection_id: None,
            payment_status: None,
            updated_at: None,
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["total"], json!(10.0));
        assert!(value.get("deliveryInfo").is_none());
        assert!(value.get("paymentStatus").is_none());
    }
}
