//! The single error type of every handler.

use aurora_core::checkout::CheckoutError;
use aurora_core::error::StoreError;
use aurora_core::media::MediaError;
use aurora_core::payment::PaymentError;
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::validation::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors that can occur in API handlers.
///
/// Every variant renders as `{"status": "fail", "message": ...}`. Causes that
/// come from the database or a remote service are logged here and replaced
/// by a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Not authorized.")]
    Unauthorized,
    #[error("Admin access required.")]
    Forbidden,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("Payment has not been completed.")]
    PaymentIncomplete,
    #[error("Payment provider error.")]
    Gateway,
    #[error("{0}")]
    Unavailable(&'static str),
    #[error("Something went wrong.")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PaymentIncomplete => StatusCode::PAYMENT_REQUIRED,
            ApiError::Gateway => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::fail(self.to_string()))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Record not found."),
            StoreError::Conflict { constraint } => {
                tracing::warn!(?constraint, "Write rejected by constraint");
                ApiError::Conflict("Record already exists or is still referenced.")
            }
            StoreError::Transient(e) => {
                tracing::error!(error = %e, "Database unavailable");
                ApiError::Unavailable("Service temporarily unavailable.")
            }
            StoreError::Unexpected(e) => {
                tracing::error!(error = %e, "Database error");
                ApiError::Internal
            }
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        tracing::error!(error = %err, "Payment provider call failed");
        ApiError::Gateway
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        tracing::error!(error = %err, "Media host call failed");
        ApiError::Gateway
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(e) => e.into(),
            CheckoutError::PaymentIncomplete(session) => {
                tracing::warn!(%session, "Checkout session has no payment");
                ApiError::PaymentIncomplete
            }
            CheckoutError::Payment(e) => e.into(),
            CheckoutError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(
            ApiError::from(StoreError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::conflict("users_email_key")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(StoreError::Transient(sqlx::Error::PoolTimedOut)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(StoreError::Unexpected(sqlx::Error::ColumnNotFound(
                "x".to_string()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_error_mapping() {
        let incomplete = CheckoutError::PaymentIncomplete("cs_test".to_string());
        assert_eq!(
            ApiError::from(incomplete).status(),
            StatusCode::PAYMENT_REQUIRED
        );

        let gateway = CheckoutError::Payment(PaymentError::Api {
            status: 404,
            message: "No such checkout.session".to_string(),
        });
        let err = ApiError::from(gateway);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Payment provider error.");

        let invalid = CheckoutError::Validation(ValidationError::new("price", "must not be negative"));
        assert_eq!(ApiError::from(invalid).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = ApiError::from(StoreError::Unexpected(sqlx::Error::ColumnNotFound(
            "password".to_string(),
        )));
        assert!(!err.to_string().contains("password"));
    }
}
