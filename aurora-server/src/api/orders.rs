//! Order lookup for signed-in users.

use aurora_core::entities::orders::GetOrderByNumber;
use aurora_sdk::objects::orders::{OrderLookupRequest, OrderResponse};
use axum::{Router, extract::State, routing::post};
use kanau::processor::Processor;

use super::extractors::{JsonBody, SessionUser};
use super::{ApiError, ApiResult, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/getOrder", post(get_order))
}

/// `POST /getOrder`: Customers only see their own orders; an order of
/// someone else answers like a missing one.
async fn get_order(
    State(state): State<AppState>,
    session: SessionUser,
    JsonBody(request): JsonBody<OrderLookupRequest>,
) -> ApiResult<OrderResponse> {
    let order = state
        .db
        .process(GetOrderByNumber {
            order_number: request.order_id,
        })
        .await?
        .filter(|order| session.is_admin() || order.user_id == Some(session.id()))
        .ok_or(ApiError::NotFound("Order not found."))?;
    ok(order.response())
}
