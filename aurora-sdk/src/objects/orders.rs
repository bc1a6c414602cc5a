//! Order bodies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::{CartItem, CheckoutAmounts, ShippingInfo};

/// Fulfillment progress of an order.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `aurora-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FulfillmentStatus::Unfulfilled => write!(f, "unfulfilled"),
            FulfillmentStatus::Processing => write!(f, "processing"),
            FulfillmentStatus::Shipped => write!(f, "shipped"),
            FulfillmentStatus::Delivered => write!(f, "delivered"),
            FulfillmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_number: i32,
    pub payment_intent: String,
    pub payment_status: String,
    pub cart_items: Vec<CartItem>,
    pub shipping: ShippingInfo,
    pub subtotal_amt: Decimal,
    pub tax_amt: Decimal,
    pub shipping_amt: Decimal,
    pub total_amt: Decimal,
    pub fulfillment_status: FulfillmentStatus,
    /// Unix timestamp of when the order was created.
    pub created_at: i64,
    pub user_id: Option<i32>,
}

impl OrderResponse {
    /// Replace the four amounts, e.g. with ones recomputed from the stored
    /// cart.
    pub fn with_amounts(mut self, amounts: CheckoutAmounts) -> Self {
        self.subtotal_amt = amounts.subtotal_amt;
        self.tax_amt = amounts.tax_amt;
        self.shipping_amt = amounts.shipping_amt;
        self.total_amt = amounts.total_amt;
        self
    }
}

/// Order line of the customer dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_number: i32,
    pub created_at: i64,
    pub fulfillment_status: FulfillmentStatus,
    pub total_amt: Decimal,
    pub shipping: ShippingInfo,
}

/// Body of `POST /orders/getOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLookupRequest {
    pub order_id: i32,
}

/// Body of `PUT /admin/orders/{id}/fulfillment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentUpdate {
    pub fulfillment_status: FulfillmentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fulfillment_status_wire_format() {
        let update: FulfillmentUpdate =
            serde_json::from_value(json!({"fulfillmentStatus": "shipped"})).unwrap();
        assert_eq!(update.fulfillment_status, FulfillmentStatus::Shipped);
        assert_eq!(FulfillmentStatus::default().to_string(), "unfulfilled");
    }
}
