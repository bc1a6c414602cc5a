use aurora_core::entities::orders::{
    GetOrderByNumber, ListOrderOverviews, UpdateFulfillmentStatus,
};
use aurora_sdk::objects::admin::{AdminOrderRow, PageQuery};
use aurora_sdk::objects::orders::{FulfillmentUpdate, OrderResponse};
use axum::extract::{Path, Query, State};
use kanau::processor::Processor;

use crate::api::extractors::JsonBody;
use crate::api::{ApiError, ApiResult, ok};
use crate::state::AppState;

const NOT_FOUND: ApiError = ApiError::NotFound("Order not found.");

/// `GET /orders`: Newest first, paginated.
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Vec<AdminOrderRow>> {
    let (limit, offset) = page.clamped();
    let rows = state
        .db
        .process(ListOrderOverviews { limit, offset })
        .await?;
    ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(order_number): Path<i32>,
) -> ApiResult<OrderResponse> {
    let order = state
        .db
        .process(GetOrderByNumber { order_number })
        .await?
        .ok_or(NOT_FOUND)?;
    ok(order.response())
}

pub async fn update_fulfillment(
    State(state): State<AppState>,
    Path(order_number): Path<i32>,
    JsonBody(update): JsonBody<FulfillmentUpdate>,
) -> ApiResult<OrderResponse> {
    let order = state
        .db
        .process(UpdateFulfillmentStatus {
            order_number,
            status: update.fulfillment_status.into(),
        })
        .await?
        .ok_or(NOT_FOUND)?;
    tracing::info!(
        order_number,
        status = %update.fulfillment_status,
        "Fulfillment status updated"
    );
    ok(order.response())
}
