use aurora_sdk::objects::{CartItem, CheckoutAmounts};
use rust_decimal::Decimal;

/// Informational tax share of a tax-inclusive subtotal (5 %).
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Derive the order amounts from a cart and a shipping cost in minor units.
///
/// Prices are tax-inclusive, so the tax amount is reported but not added to
/// the total.
pub fn calculate_amounts(items: &[CartItem], shipping_minor: i64) -> CheckoutAmounts {
    let subtotal_amt: Decimal = items.iter().map(CartItem::line_total).sum();
    let shipping_amt = Decimal::new(shipping_minor, 2);
    CheckoutAmounts {
        subtotal_amt,
        tax_amt: (subtotal_amt * TAX_RATE).ceil(),
        shipping_amt,
        total_amt: (subtotal_amt + shipping_amt).ceil(),
    }
}
