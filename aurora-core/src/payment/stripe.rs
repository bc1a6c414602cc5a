//! Stripe Checkout over its REST API.
//!
//! Stripe takes `application/x-www-form-urlencoded` bodies with bracketed
//! keys for nested objects (`line_items[0][price_data][currency]`), so the
//! body is a flat list of key/value pairs.

use std::time::Duration;

use aurora_sdk::objects::{CartItem, STANDARD_SHIPPING};
use kanau::processor::Processor;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use super::{
    CheckoutSession, CheckoutSessionStatus, CreateCheckoutSession, PaymentError,
    RetrieveCheckoutSession,
};

/// Client for the Stripe Checkout API.
#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: Url,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>, api_base: Url) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            secret_key: secret_key.into(),
            api_base,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, PaymentError> {
        self.api_base
            .join(path)
            .map_err(|e| PaymentError::InvalidResponse(format!("invalid endpoint {path}: {e}")))
    }

    fn create_session_request(
        &self,
        request: &CreateCheckoutSession,
    ) -> Result<reqwest::RequestBuilder, PaymentError> {
        Ok(self
            .http
            .post(self.endpoint("/v1/checkout/sessions")?)
            .bearer_auth(&self.secret_key)
            .form(&session_form(request)?))
    }

    async fn read_session(response: reqwest::Response) -> Result<SessionObject, PaymentError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            warn!(status = status.as_u16(), %message, "Stripe request failed");
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&body).map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    payment_intent: Option<String>,
    payment_status: String,
    #[serde(default)]
    total_details: Option<TotalDetails>,
}

#[derive(Debug, Deserialize)]
struct TotalDetails {
    #[serde(default)]
    amount_shipping: i64,
}

impl From<SessionObject> for CheckoutSessionStatus {
    fn from(session: SessionObject) -> Self {
        Self {
            payment_intent: session.payment_intent.filter(|pi| !pi.is_empty()),
            payment_status: session.payment_status,
            shipping_amount_minor: session
                .total_details
                .map(|details| details.amount_shipping)
                .unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Form encoding
// ---------------------------------------------------------------------------

/// Convert a major-unit price to minor units (`250.5` -> `25050`).
pub(crate) fn to_minor_units(amount: Decimal) -> Result<i64, PaymentError> {
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .ok_or(PaymentError::InvalidAmount(amount))
}

fn session_form(request: &CreateCheckoutSession) -> Result<Vec<(String, String)>, PaymentError> {
    let origin = request.origin.trim_end_matches('/');
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("submit_type".to_string(), "pay".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        (
            "success_url".to_string(),
            format!(
                "{origin}/checkout/confirmation?session_id={{CHECKOUT_SESSION_ID}}&session_status=1"
            ),
        ),
        ("cancel_url".to_string(), format!("{origin}/cancelled")),
    ];

    let rate = "shipping_options[0][shipping_rate_data]";
    form.push((format!("{rate}[type]"), "fixed_amount".to_string()));
    form.push((format!("{rate}[display_name]"), STANDARD_SHIPPING.to_string()));
    form.push((
        format!("{rate}[fixed_amount][amount]"),
        request.shipping_cost_minor.to_string(),
    ));
    form.push((
        format!("{rate}[fixed_amount][currency]"),
        request.currency.clone(),
    ));

    for (index, item) in request.cart_items.iter().enumerate() {
        push_line_item(&mut form, index, item, &request.currency)?;
    }
    Ok(form)
}

fn push_line_item(
    form: &mut Vec<(String, String)>,
    index: usize,
    item: &CartItem,
    currency: &str,
) -> Result<(), PaymentError> {
    let prefix = format!("line_items[{index}]");
    form.push((
        format!("{prefix}[price_data][currency]"),
        currency.to_string(),
    ));
    form.push((
        format!("{prefix}[price_data][tax_behavior]"),
        "inclusive".to_string(),
    ));
    form.push((
        format!("{prefix}[price_data][product_data][name]"),
        item.product_title.clone(),
    ));
    form.push((
        format!("{prefix}[price_data][unit_amount]"),
        to_minor_units(item.price)?.to_string(),
    ));
    form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Processors
// ---------------------------------------------------------------------------

impl Processor<CreateCheckoutSession> for StripeClient {
    type Output = CheckoutSession;
    type Error = PaymentError;
    #[tracing::instrument(skip_all, err, name = "Stripe:CreateCheckoutSession")]
    async fn process(&self, request: CreateCheckoutSession) -> Result<CheckoutSession, PaymentError> {
        let response = self.create_session_request(&request)?.send().await?;
        let session = Self::read_session(response).await?;
        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }
}

impl Processor<RetrieveCheckoutSession> for StripeClient {
    type Output = CheckoutSessionStatus;
    type Error = PaymentError;
    #[tracing::instrument(skip_all, err, name = "Stripe:RetrieveCheckoutSession")]
    async fn process(
        &self,
        request: RetrieveCheckoutSession,
    ) -> Result<CheckoutSessionStatus, PaymentError> {
        let path = format!(
            "/v1/checkout/sessions/{}",
            urlencoding::encode(request.session_id.trim())
        );
        let response = self
            .http
            .get(self.endpoint(&path)?)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Ok(Self::read_session(response).await?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateCheckoutSession {
        CreateCheckoutSession {
            cart_items: vec![
                CartItem {
                    price: Decimal::new(2505, 1),
                    quantity: 2,
                    product_title: "Aurora Ring".to_string(),
                },
                CartItem {
                    price: Decimal::from(40),
                    quantity: 1,
                    product_title: "Gift & Box".to_string(),
                },
            ],
            currency: "aed".to_string(),
            shipping_cost_minor: 2000,
            origin: "https://shop.example.com/".to_string(),
        }
    }

    fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_session_form_fields() {
        let form = session_form(&request()).unwrap();
        assert_eq!(value(&form, "mode"), Some("payment"));
        assert_eq!(value(&form, "submit_type"), Some("pay"));
        assert_eq!(
            value(&form, "line_items[0][price_data][unit_amount]"),
            Some("25050")
        );
        assert_eq!(
            value(&form, "line_items[0][price_data][tax_behavior]"),
            Some("inclusive")
        );
        assert_eq!(value(&form, "line_items[0][quantity]"), Some("2"));
        assert_eq!(
            value(&form, "line_items[1][price_data][product_data][name]"),
            Some("Gift & Box")
        );
        assert_eq!(
            value(
                &form,
                "shipping_options[0][shipping_rate_data][fixed_amount][amount]"
            ),
            Some("2000")
        );
        assert_eq!(
            value(&form, "success_url"),
            Some(
                "https://shop.example.com/checkout/confirmation?session_id={CHECKOUT_SESSION_ID}&session_status=1"
            )
        );
        assert_eq!(
            value(&form, "cancel_url"),
            Some("https://shop.example.com/cancelled")
        );
    }

    #[test]
    fn test_create_request_is_form_encoded() {
        let client = StripeClient::new("sk_test_123", Url::parse("https://api.stripe.test").unwrap());
        let built = client
            .create_session_request(&request())
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(built.url().as_str(), "https://api.stripe.test/v1/checkout/sessions");
        assert_eq!(
            built.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            built.headers()[reqwest::header::AUTHORIZATION],
            "Bearer sk_test_123"
        );
        let body = std::str::from_utf8(built.body().unwrap().as_bytes().unwrap()).unwrap();
        assert!(body.starts_with("mode=payment&submit_type=pay&"));
        assert!(body.contains("line_items%5B0%5D%5Bquantity%5D=2"));
        assert!(body.contains("line_items%5B1%5D%5Bprice_data%5D%5Bproduct_data%5D%5Bname%5D=Gift+%26+Box"));
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(Decimal::new(1999, 2)).unwrap(), 1999);
        assert_eq!(to_minor_units(Decimal::from(250)).unwrap(), 25000);
    }

    #[test]
    fn test_retrieved_session_parsing() {
        let session: SessionObject = serde_json::from_str(
            r#"{
                "id": "cs_test_123",
                "object": "checkout.session",
                "payment_intent": "pi_123",
                "payment_status": "paid",
                "total_details": {"amount_discount": 0, "amount_shipping": 2000, "amount_tax": 0}
            }"#,
        )
        .unwrap();
        let status = CheckoutSessionStatus::from(session);
        assert_eq!(status.payment_intent.as_deref(), Some("pi_123"));
        assert_eq!(status.payment_status, "paid");
        assert_eq!(status.shipping_amount_minor, 2000);
    }

    #[test]
    fn test_unpaid_session_has_no_intent() {
        let session: SessionObject = serde_json::from_str(
            r#"{"id": "cs_test_456", "payment_intent": null, "payment_status": "unpaid"}"#,
        )
        .unwrap();
        let status = CheckoutSessionStatus::from(session);
        assert_eq!(status.payment_intent, None);
        assert_eq!(status.shipping_amount_minor, 0);
    }

    #[test]
    fn test_error_envelope() {
        let envelope: ErrorEnvelope = serde_json::from_str(
            r#"{"error": {"message": "No such checkout.session: cs_x", "type": "invalid_request_error"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.error.message, "No such checkout.session: cs_x");
    }
}
