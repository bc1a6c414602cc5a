//! Admin dashboard request and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::orders::{FulfillmentStatus, OrderSummary};
use super::user::AddressBook;

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One line of the admin order table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderRow {
    pub order_number: i32,
    pub created_at: i64,
    pub fulfillment_status: FulfillmentStatus,
    pub total_amt: Decimal,
    pub shipping_method: String,
    /// Customer name, empty for guest orders.
    pub name: String,
    #[serde(rename = "payment_status")]
    pub payment_status: String,
}

/// One line of the admin customer table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub primary_address: PrimaryAddress,
    pub order_count: i64,
}

/// City and country of the stored address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAddress {
    pub city: String,
    pub country: String,
}

impl From<&AddressBook> for PrimaryAddress {
    fn from(book: &AddressBook) -> Self {
        Self {
            city: book.city.clone(),
            country: book.country.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub primary_address: AddressBook,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderInfo {
    pub order_count: usize,
    pub total_spent: Decimal,
    pub orders: Vec<OrderSummary>,
}

/// `GET /admin/users/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDetail {
    pub user_info: AdminUserInfo,
    pub order_info: AdminOrderInfo,
}

impl AdminOrderInfo {
    pub fn from_orders(orders: Vec<OrderSummary>) -> Self {
        Self {
            order_count: orders.len(),
            total_spent: orders.iter().map(|o| o.total_amt).sum(),
            orders,
        }
    }
}

/// Join first and last name, skipping missing parts.
pub fn display_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;
const MAX_OFFSET: i64 = 100_000;

/// Query parameters of the admin list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageQuery {
    pub fn clamped(&self) -> (i64, i64) {
        clamp_pagination(self.limit, self.offset)
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Clamp limit and offset to safe maximums.
pub fn clamp_pagination(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_LIMIT), offset.clamp(0, MAX_OFFSET))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ShippingInfo;

    #[test]
    fn test_clamp_pagination() {
        assert_eq!(clamp_pagination(0, -5), (1, 0));
        assert_eq!(clamp_pagination(10_000, 10), (MAX_LIMIT, 10));
        assert_eq!(PageQuery::default().clamped(), (DEFAULT_LIMIT, 0));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Some("Jane"), Some("Doe")), "Jane Doe");
        assert_eq!(display_name(None, Some("Doe")), "Doe");
        assert_eq!(display_name(Some(" "), None), "");
    }

    #[test]
    fn test_order_info_totals() {
        let summary = |n: i32, total: i64| OrderSummary {
            order_number: n,
            created_at: 0,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            total_amt: Decimal::from(total),
            shipping: ShippingInfo::standard(serde_json::json!({})),
        };
        let info = AdminOrderInfo::from_orders(vec![summary(1, 270), summary(2, 30)]);
        assert_eq!(info.order_count, 2);
        assert_eq!(info.total_spent, Decimal::from(300));
    }
}
