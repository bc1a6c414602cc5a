//! Cart items and the amounts derived from them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{Validate, ValidationError};

/// Shipping method recorded on every order.
pub const STANDARD_SHIPPING: &str = "standard";

/// Free-form buyer details captured on the shipping page.
pub type BuyerInfo = serde_json::Value;

/// One line of a cart. `price` is the tax-inclusive unit price in major
/// currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub price: Decimal,
    pub quantity: u32,
    pub product_title: String,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl Validate for CartItem {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.price < Decimal::ZERO {
            return Err(ValidationError::new("price", "must not be negative"));
        }
        if self.product_title.trim().is_empty() {
            return Err(ValidationError::new("productTitle", "must not be empty"));
        }
        Ok(())
    }
}

/// Shipping block stored on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub shipping_address: BuyerInfo,
    pub shipping_method: String,
}

impl ShippingInfo {
    pub fn standard(shipping_address: BuyerInfo) -> Self {
        Self {
            shipping_address,
            shipping_method: STANDARD_SHIPPING.to_string(),
        }
    }
}

/// Amounts derived from a cart and a shipping cost, in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutAmounts {
    pub subtotal_amt: Decimal,
    pub tax_amt: Decimal,
    pub shipping_amt: Decimal,
    pub total_amt: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_item_wire_format() {
        let item: CartItem = serde_json::from_value(json!({
            "price": 100,
            "quantity": 2,
            "productTitle": "Aurora Ring"
        }))
        .unwrap();
        assert_eq!(item.price, Decimal::from(100));
        assert_eq!(item.line_total(), Decimal::from(200));
    }

    #[test]
    fn test_negative_quantity_does_not_deserialize() {
        let parsed = serde_json::from_value::<CartItem>(json!({
            "price": 100,
            "quantity": -1,
            "productTitle": "Aurora Ring"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_cart_item_validation() {
        let mut item = CartItem {
            price: Decimal::from(0),
            quantity: 0,
            product_title: "Gift wrap".to_string(),
        };
        assert!(item.validate().is_ok());

        item.price = Decimal::from(-5);
        assert_eq!(item.validate().unwrap_err().field, "price");

        item.price = Decimal::from(5);
        item.product_title = "   ".to_string();
        assert_eq!(item.validate().unwrap_err().field, "productTitle");
    }
}
