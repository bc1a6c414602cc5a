//! Request and response bodies of the storefront API.
//!
//! Every handler answers with an [`ApiResponse`] envelope. Clients look at
//! `status` first; `data` carries the payload on success and, for the
//! duplicate-checkout case, the already persisted order.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod conditions;
pub mod orders;
pub mod user;

pub use cart::{BuyerInfo, CartItem, CheckoutAmounts, STANDARD_SHIPPING, ShippingInfo};
pub use orders::FulfillmentStatus;

use serde::{Deserialize, Serialize};

/// Outcome marker carried by every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
}

/// Common response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn fail_with(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Role carried in the session claims.
///
/// This is the API/DTO version without sqlx::Type.
/// For database operations, use the version in `aurora-core::entities`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(ok, json!({"status": "success", "data": [1, 2]}));

        let fail = serde_json::to_value(ApiResponse::fail("Product not found.")).unwrap();
        assert_eq!(
            fail,
            json!({"status": "fail", "message": "Product not found."})
        );
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), json!("admin"));
        let role: Role = serde_json::from_value(json!("customer")).unwrap();
        assert_eq!(role, Role::Customer);
    }
}
