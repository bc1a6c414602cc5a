use aurora_sdk::objects::admin::{AdminOrderRow, display_name};
use aurora_sdk::objects::orders::{OrderResponse, OrderSummary};
use aurora_sdk::objects::{CartItem, CheckoutAmounts, ShippingInfo};
use kanau::processor::Processor;
use rust_decimal::Decimal;
use sqlx::types::Json;

use crate::entities::{FulfillmentStatus, unix_timestamp};
use crate::error::StoreError;
use crate::framework::DatabaseProcessor;

/// Unique constraint that makes the payment intent an idempotency key.
pub const PAYMENT_INTENT_CONSTRAINT: &str = "orders_payment_intent_key";

const ORDER_COLUMNS: &str = "order_number, payment_intent, payment_status, cart_items, shipping, \
    subtotal_amt, tax_amt, shipping_amt, total_amt, fulfillment_status, user_id, created_at";

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderRecord {
    pub order_number: i32,
    /// Idempotency key of the checkout. Unique across orders.
    pub payment_intent: String,
    pub payment_status: String,
    pub cart_items: Json<Vec<CartItem>>,
    pub shipping: Json<ShippingInfo>,
    pub subtotal_amt: Decimal,
    pub tax_amt: Decimal,
    pub shipping_amt: Decimal,
    pub total_amt: Decimal,
    pub fulfillment_status: FulfillmentStatus,
    pub user_id: Option<i32>,
    pub created_at: time::PrimitiveDateTime,
}

impl OrderRecord {
    pub fn response(&self) -> OrderResponse {
        OrderResponse {
            order_number: self.order_number,
            payment_intent: self.payment_intent.clone(),
            payment_status: self.payment_status.clone(),
            cart_items: self.cart_items.0.clone(),
            shipping: self.shipping.0.clone(),
            subtotal_amt: self.subtotal_amt,
            tax_amt: self.tax_amt,
            shipping_amt: self.shipping_amt,
            total_amt: self.total_amt,
            fulfillment_status: self.fulfillment_status.into(),
            created_at: unix_timestamp(self.created_at),
            user_id: self.user_id,
        }
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            order_number: self.order_number,
            created_at: unix_timestamp(self.created_at),
            fulfillment_status: self.fulfillment_status.into(),
            total_amt: self.total_amt,
            shipping: self.shipping.0.clone(),
        }
    }
}

/// An order joined with the name of its customer.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderOverviewRow {
    pub order_number: i32,
    pub created_at: time::PrimitiveDateTime,
    pub fulfillment_status: FulfillmentStatus,
    pub total_amt: Decimal,
    pub shipping: Json<ShippingInfo>,
    pub payment_status: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<OrderOverviewRow> for AdminOrderRow {
    fn from(row: OrderOverviewRow) -> Self {
        Self {
            order_number: row.order_number,
            created_at: unix_timestamp(row.created_at),
            fulfillment_status: row.fulfillment_status.into(),
            total_amt: row.total_amt,
            shipping_method: row.shipping.0.shipping_method,
            name: display_name(row.first_name.as_deref(), row.last_name.as_deref()),
            payment_status: row.payment_status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetOrderByNumber {
    pub order_number: i32,
}

impl Processor<GetOrderByNumber> for DatabaseProcessor {
    type Output = Option<OrderRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOrderByNumber")]
    async fn process(&self, query: GetOrderByNumber) -> Result<Option<OrderRecord>, StoreError> {
        let row = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(query.order_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[derive(Debug, Clone)]
pub struct GetOrderByPaymentIntent {
    pub payment_intent: String,
}

impl Processor<GetOrderByPaymentIntent> for DatabaseProcessor {
    type Output = Option<OrderRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOrderByPaymentIntent")]
    async fn process(
        &self,
        query: GetOrderByPaymentIntent,
    ) -> Result<Option<OrderRecord>, StoreError> {
        let row = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_intent = $1"
        ))
        .bind(query.payment_intent)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Persist a paid checkout. A second order for the same payment intent
/// yields [`StoreError::Conflict`].
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub payment_intent: String,
    pub payment_status: String,
    pub cart_items: Vec<CartItem>,
    pub shipping: ShippingInfo,
    pub amounts: CheckoutAmounts,
    pub user_id: Option<i32>,
}

impl Processor<CreateOrder> for DatabaseProcessor {
    type Output = OrderRecord;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateOrder")]
    async fn process(&self, insert: CreateOrder) -> Result<OrderRecord, StoreError> {
        let row = sqlx::query_as::<_, OrderRecord>(&format!(
            r#"
            INSERT INTO orders (payment_intent, payment_status, cart_items, shipping,
                subtotal_amt, tax_amt, shipping_amt, total_amt, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(insert.payment_intent)
        .bind(insert.payment_status)
        .bind(Json(insert.cart_items))
        .bind(Json(insert.shipping))
        .bind(insert.amounts.subtotal_amt)
        .bind(insert.amounts.tax_amt)
        .bind(insert.amounts.shipping_amt)
        .bind(insert.amounts.total_amt)
        .bind(insert.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Orders for the admin table, newest first.
#[derive(Debug, Clone)]
pub struct ListOrderOverviews {
    pub limit: i64,
    pub offset: i64,
}

impl Processor<ListOrderOverviews> for DatabaseProcessor {
    type Output = Vec<OrderOverviewRow>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListOrderOverviews")]
    async fn process(&self, query: ListOrderOverviews) -> Result<Vec<OrderOverviewRow>, StoreError> {
        let rows = sqlx::query_as::<_, OrderOverviewRow>(
            r#"
            SELECT o.order_number, o.created_at, o.fulfillment_status, o.total_amt,
                   o.shipping, o.payment_status, u.first_name, u.last_name
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            ORDER BY o.order_number DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, Clone)]
pub struct ListOrdersForUser {
    pub user_id: i32,
}

impl Processor<ListOrdersForUser> for DatabaseProcessor {
    type Output = Vec<OrderRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:ListOrdersForUser")]
    async fn process(&self, query: ListOrdersForUser) -> Result<Vec<OrderRecord>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY order_number DESC"
        ))
        .bind(query.user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// `None` when the order does not exist.
#[derive(Debug, Clone)]
pub struct UpdateFulfillmentStatus {
    pub order_number: i32,
    pub status: FulfillmentStatus,
}

impl Processor<UpdateFulfillmentStatus> for DatabaseProcessor {
    type Output = Option<OrderRecord>;
    type Error = StoreError;
    #[tracing::instrument(skip_all, err, name = "SQL:UpdateFulfillmentStatus")]
    async fn process(
        &self,
        update: UpdateFulfillmentStatus,
    ) -> Result<Option<OrderRecord>, StoreError> {
        let row = sqlx::query_as::<_, OrderRecord>(&format!(
            "UPDATE orders SET fulfillment_status = $2 WHERE order_number = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(update.order_number)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_sdk::objects::FulfillmentStatus as SdkFulfillmentStatus;
    use serde_json::json;

    #[test]
    fn test_overview_row_to_admin_row() {
        let row = OrderOverviewRow {
            order_number: 12,
            created_at: time::macros::datetime!(2024-01-01 00:00:00),
            fulfillment_status: FulfillmentStatus::Processing,
            total_amt: Decimal::from(270),
            shipping: Json(ShippingInfo::standard(json!({"city": "Dubai"}))),
            payment_status: "paid".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
        };
        let admin_row = AdminOrderRow::from(row);
        assert_eq!(admin_row.name, "Jane");
        assert_eq!(admin_row.shipping_method, "standard");
        assert_eq!(admin_row.fulfillment_status, SdkFulfillmentStatus::Processing);
        assert_eq!(admin_row.created_at, 1_704_067_200);
    }
}
