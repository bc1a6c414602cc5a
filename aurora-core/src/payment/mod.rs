//! Hosted checkout provider.
//!
//! The storefront never sees card data. It creates a hosted checkout session
//! for the cart, redirects the buyer to it, and after the redirect back
//! retrieves the session to learn the payment intent and status.

mod stripe;

pub use stripe::StripeClient;

use aurora_sdk::objects::CartItem;
use rust_decimal::Decimal;

/// Errors returned by the checkout provider client.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with an error body.
    #[error("provider rejected request with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("amount {0} cannot be expressed in minor units")]
    InvalidAmount(Decimal),
}

/// Create a hosted checkout session for a cart.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSession {
    pub cart_items: Vec<CartItem>,
    /// ISO currency code, lowercase.
    pub currency: String,
    pub shipping_cost_minor: i64,
    /// Frontend origin the buyer is sent back to.
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Look up a checkout session after the buyer returns.
#[derive(Debug, Clone)]
pub struct RetrieveCheckoutSession {
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionStatus {
    /// Absent until the buyer has submitted a payment.
    pub payment_intent: Option<String>,
    pub payment_status: String,
    pub shipping_amount_minor: i64,
}
