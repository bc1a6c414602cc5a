//! Hosted checkout.
//!
//! # Endpoints
//!
//! - `POST /`               – open a checkout session for a cart
//! - `POST /retrieve`       – turn a finished checkout into an order
//! - `GET  /retrieve/{id}`  – payment state of a checkout session

use aurora_core::checkout::{ReconcileCheckout, Reconciliation, reconcile_checkout};
use aurora_core::payment::{CreateCheckoutSession, RetrieveCheckoutSession};
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::checkout::{
    CheckoutSessionResponse, CreatePaymentRequest, PaymentDetails, ReconcileCheckoutRequest,
};
use aurora_sdk::objects::orders::OrderResponse;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use kanau::processor::Processor;

use super::extractors::{SessionUser, ValidJson};
use super::{ApiError, ApiResult, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_checkout_session))
        .route("/retrieve", post(reconcile))
        .route("/retrieve/{session_id}", get(payment_details))
}

async fn create_checkout_session(
    State(state): State<AppState>,
    session: SessionUser,
    headers: HeaderMap,
    ValidJson(request): ValidJson<CreatePaymentRequest>,
) -> ApiResult<CheckoutSessionResponse> {
    let request_origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    let origin = state
        .config
        .server
        .read()
        .await
        .return_origin(request_origin)
        .to_string();
    let (currency, shipping_cost_minor) = {
        let payment = state.config.payment.read().await;
        (payment.currency.clone(), payment.shipping_cost_minor)
    };

    let stripe = state.stripe.read().await.clone();
    let checkout = stripe
        .process(CreateCheckoutSession {
            cart_items: request.cart_items,
            currency,
            shipping_cost_minor,
            origin,
        })
        .await?;
    tracing::info!(user_id = session.id(), session_id = %checkout.id, "Checkout session opened");

    ok(CheckoutSessionResponse {
        id: checkout.id,
        url: checkout.url,
    })
}

/// `POST /retrieve`: A replayed checkout answers `200` with status `fail`,
/// message `Order exists.` and the stored order with recomputed amounts.
async fn reconcile(
    State(state): State<AppState>,
    session: SessionUser,
    ValidJson(request): ValidJson<ReconcileCheckoutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OrderResponse>>), ApiError> {
    let stripe = state.stripe.read().await.clone();
    let reconciliation = reconcile_checkout(
        &stripe,
        &state.db,
        ReconcileCheckout {
            session_id: request.session_id,
            cart_items: request.cart_items,
            buyer_info: request.user_info,
            user_id: Some(session.id()),
        },
    )
    .await?;

    Ok(match reconciliation {
        Reconciliation::Created(order) => (
            StatusCode::CREATED,
            Json(ApiResponse::success_with("Order created.", order.response())),
        ),
        Reconciliation::Duplicate(order, amounts) => (
            StatusCode::OK,
            Json(ApiResponse::fail_with(
                "Order exists.",
                order.response().with_amounts(amounts),
            )),
        ),
    })
}

async fn payment_details(
    State(state): State<AppState>,
    _session: SessionUser,
    Path(session_id): Path<String>,
) -> ApiResult<PaymentDetails> {
    let stripe = state.stripe.read().await.clone();
    let status = stripe
        .process(RetrieveCheckoutSession { session_id })
        .await?;
    ok(PaymentDetails {
        payment_status: status.payment_status,
        payment_intent: status.payment_intent,
    })
}
