use serde::{Deserialize, Serialize};

use super::cart::{BuyerInfo, CartItem};
use crate::validation::{Validate, ValidationError};

/// Body of `POST /payments`: the cart as sent by the shipping page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatePaymentRequest {
    pub cart_items: Vec<CartItem>,
}

impl Validate for CreatePaymentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.cart_items.is_empty() {
            return Err(ValidationError::new("cartItems", "must not be empty"));
        }
        self.cart_items.validate()
    }
}

/// A hosted checkout session the browser is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
    pub url: Option<String>,
}

/// Body of `POST /payments/retrieve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileCheckoutRequest {
    #[serde(rename = "session_id")]
    pub session_id: String,
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub user_info: BuyerInfo,
}

impl Validate for ReconcileCheckoutRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.session_id.trim().is_empty() {
            return Err(ValidationError::new("session_id", "must not be empty"));
        }
        self.cart_items.validate()
    }
}

/// Payment state of a checkout session as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub payment_status: String,
    pub payment_intent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_payment_request_is_a_bare_array() {
        let request: CreatePaymentRequest = serde_json::from_value(json!([
            {"price": 100, "quantity": 2, "productTitle": "Aurora Ring"}
        ]))
        .unwrap();
        assert_eq!(request.cart_items.len(), 1);
        assert!(request.validate().is_ok());

        let empty = CreatePaymentRequest { cart_items: vec![] };
        assert_eq!(empty.validate().unwrap_err().field, "cartItems");
    }

    #[test]
    fn test_reconcile_request_field_names() {
        let request: ReconcileCheckoutRequest = serde_json::from_value(json!({
            "session_id": "cs_test_123",
            "cartItems": [{"price": "12.50", "quantity": 1, "productTitle": "Daria Hoops"}],
            "userInfo": {"firstName": "Jane", "city": "Dubai"}
        }))
        .unwrap();
        assert_eq!(request.session_id, "cs_test_123");
        assert_eq!(request.user_info["city"], "Dubai");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_reconcile_request_rejects_blank_session() {
        let request = ReconcileCheckoutRequest {
            session_id: " ".to_string(),
            cart_items: vec![],
            user_info: json!({}),
        };
        assert_eq!(request.validate().unwrap_err().field, "session_id");
    }
}
