//! HTTP API of the storefront, mounted under `/api`.
//!
//! # Groups
//!
//! - `/products`    – public catalog listing, search and product pages
//! - `/collections` – public main-collection and collection pages
//! - `/auth`        – registration, login, logout, profile
//! - `/users`       – the signed-in customer's dashboard
//! - `/orders`      – order lookup
//! - `/payments`    – hosted checkout and reconciliation
//! - `/admin`       – catalog, order, customer and conditions management

use aurora_core::error::StoreError;
use aurora_sdk::objects::ApiResponse;
use axum::{Json, Router, http::StatusCode};

use crate::state::AppState;

mod admin;
mod auth;
mod collections;
mod error;
mod extractors;
mod orders;
mod payments;
mod products;
mod users;

pub use error::ApiError;

/// Result of a handler that answers with the common envelope.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap `data` in a success envelope.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Result of a handler that created a resource.
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn created<T>(message: &str, data: T) -> CreatedResult<T> {
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with(message, data)),
    ))
}

/// Map a constraint violation to a 409 carrying `message`; every other
/// failure maps as usual.
pub fn conflict_as(message: &'static str) -> impl Fn(StoreError) -> ApiError {
    move |err| {
        if err.is_conflict() {
            ApiError::Conflict(message)
        } else {
            err.into()
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/collections", collections::router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/orders", orders::router())
        .nest("/payments", payments::router())
        .nest("/admin", admin::router(state))
}
