use url::Url;

use crate::payment::StripeClient;

#[derive(Clone)]
pub struct PaymentConfig {
    pub secret_key: String,
    /// Lowercase ISO currency code.
    pub currency: String,
    /// Flat shipping cost per order, in minor units.
    pub shipping_cost_minor: i64,
    pub api_base: Url,
}

impl PaymentConfig {
    pub fn client(&self) -> StripeClient {
        StripeClient::new(self.secret_key.clone(), self.api_base.clone())
    }
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("secret_key", &"<redacted>")
            .field("currency", &self.currency)
            .field("shipping_cost_minor", &self.shipping_cost_minor)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}
