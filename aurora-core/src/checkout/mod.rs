//! Checkout: amount calculation and order reconciliation.

mod amounts;
mod reconcile;

pub use amounts::{TAX_RATE, calculate_amounts};
pub use reconcile::{CheckoutError, ReconcileCheckout, Reconciliation, reconcile_checkout};
