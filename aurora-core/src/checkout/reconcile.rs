//! Turning a completed hosted checkout into exactly one order.
//!
//! The buyer's browser calls back after the provider redirects it, and may do
//! so more than once (reloads, retries, two tabs). The payment intent of the
//! session is the idempotency key: the first call creates the order, every
//! later call gets the stored order back as a duplicate. Two concurrent
//! first calls race on the unique `orders.payment_intent` constraint; the
//! loser re-reads the winner's order.

use aurora_sdk::objects::{BuyerInfo, CartItem, CheckoutAmounts, ShippingInfo};
use aurora_sdk::validation::{Validate, ValidationError};
use kanau::processor::Processor;
use tracing::{info, warn};

use super::calculate_amounts;
use crate::entities::orders::{
    CreateOrder, GetOrderByPaymentIntent, OrderRecord, PAYMENT_INTENT_CONSTRAINT,
};
use crate::error::StoreError;
use crate::payment::{CheckoutSessionStatus, PaymentError, RetrieveCheckoutSession};

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("invalid cart: {0}")]
    Validation(#[from] ValidationError),

    /// The session exists but carries no payment intent yet.
    #[error("checkout session {0} has no payment")]
    PaymentIncomplete(String),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A finished checkout as reported by the buyer's browser.
#[derive(Debug, Clone)]
pub struct ReconcileCheckout {
    pub session_id: String,
    pub cart_items: Vec<CartItem>,
    pub buyer_info: BuyerInfo,
    /// Account that placed the order, if signed in.
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// First reconciliation of this payment: the order was created.
    Created(OrderRecord),
    /// The payment was already reconciled. Amounts are recomputed from the
    /// stored cart.
    Duplicate(OrderRecord, CheckoutAmounts),
}

impl Reconciliation {
    pub fn order(&self) -> &OrderRecord {
        match self {
            Reconciliation::Created(order) | Reconciliation::Duplicate(order, _) => order,
        }
    }
}

fn duplicate(order: OrderRecord, shipping_minor: i64) -> Reconciliation {
    let amounts = calculate_amounts(&order.cart_items.0, shipping_minor);
    Reconciliation::Duplicate(order, amounts)
}

/// Reconcile a checkout session against the order store.
pub async fn reconcile_checkout<G, S>(
    gateway: &G,
    store: &S,
    request: ReconcileCheckout,
) -> Result<Reconciliation, CheckoutError>
where
    G: Processor<
            RetrieveCheckoutSession,
            Output = CheckoutSessionStatus,
            Error = PaymentError,
        >,
    S: Processor<GetOrderByPaymentIntent, Output = Option<OrderRecord>, Error = StoreError>
        + Processor<CreateOrder, Output = OrderRecord, Error = StoreError>,
{
    request.cart_items.validate()?;

    let session = gateway
        .process(RetrieveCheckoutSession {
            session_id: request.session_id.clone(),
        })
        .await?;
    let Some(payment_intent) = session.payment_intent else {
        warn!(session_id = %request.session_id, "Checkout session has no payment intent");
        return Err(CheckoutError::PaymentIncomplete(request.session_id));
    };

    let lookup = GetOrderByPaymentIntent {
        payment_intent: payment_intent.clone(),
    };
    if let Some(existing) = Processor::<GetOrderByPaymentIntent>::process(store, lookup).await? {
        info!(order_number = existing.order_number, "Checkout already reconciled");
        return Ok(duplicate(existing, session.shipping_amount_minor));
    }

    let amounts = calculate_amounts(&request.cart_items, session.shipping_amount_minor);
    let insert = CreateOrder {
        payment_intent: payment_intent.clone(),
        payment_status: session.payment_status,
        cart_items: request.cart_items,
        shipping: ShippingInfo::standard(request.buyer_info),
        amounts,
        user_id: request.user_id,
    };
    let created = Processor::<CreateOrder>::process(store, insert).await;

    match created {
        Ok(order) => {
            info!(order_number = order.order_number, "Order created from checkout");
            Ok(Reconciliation::Created(order))
        }
        Err(StoreError::Conflict { constraint })
            if constraint.as_deref() == Some(PAYMENT_INTENT_CONSTRAINT) =>
        {
            // Lost the race against a concurrent reconciliation.
            let lookup = GetOrderByPaymentIntent { payment_intent };
            let winner = Processor::<GetOrderByPaymentIntent>::process(store, lookup)
                .await?
                .ok_or(StoreError::NotFound)?;
            info!(order_number = winner.order_number, "Concurrent checkout reconciled first");
            Ok(duplicate(winner, session.shipping_amount_minor))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::FulfillmentStatus;
    use rust_decimal::Decimal;
    use serde_json::json;
    use sqlx::types::Json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGateway {
        result: Mutex<Option<Result<CheckoutSessionStatus, PaymentError>>>,
        calls: AtomicUsize,
    }

    impl FakeGateway {
        fn paid(intent: &str, shipping_minor: i64) -> Self {
            Self::with(Ok(CheckoutSessionStatus {
                payment_intent: Some(intent.to_string()),
                payment_status: "paid".to_string(),
                shipping_amount_minor: shipping_minor,
            }))
        }

        fn with(result: Result<CheckoutSessionStatus, PaymentError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Processor<RetrieveCheckoutSession> for FakeGateway {
        type Output = CheckoutSessionStatus;
        type Error = PaymentError;
        async fn process(
            &self,
            _: RetrieveCheckoutSession,
        ) -> Result<CheckoutSessionStatus, PaymentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut slot = self.result.lock().unwrap();
            if let Some(Ok(status)) = slot.as_ref() {
                return Ok(status.clone());
            }
            slot.take().unwrap_or_else(|| {
                Err(PaymentError::InvalidResponse("called twice".to_string()))
            })
        }
    }

    /// In-memory order store. With `race` set, the first insert pretends a
    /// concurrent request won: it stores the order but reports a conflict.
    /// `reject` fails the next insert with the given error.
    #[derive(Default)]
    struct FakeStore {
        orders: Mutex<Vec<OrderRecord>>,
        race: Mutex<bool>,
        reject: Mutex<Option<StoreError>>,
        lookups: AtomicUsize,
    }

    impl Processor<GetOrderByPaymentIntent> for FakeStore {
        type Output = Option<OrderRecord>;
        type Error = StoreError;
        async fn process(
            &self,
            query: GetOrderByPaymentIntent,
        ) -> Result<Option<OrderRecord>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let orders = self.orders.lock().unwrap();
            Ok(orders
                .iter()
                .find(|o| o.payment_intent == query.payment_intent)
                .cloned())
        }
    }

    impl Processor<CreateOrder> for FakeStore {
        type Output = OrderRecord;
        type Error = StoreError;
        async fn process(&self, insert: CreateOrder) -> Result<OrderRecord, StoreError> {
            if let Some(err) = self.reject.lock().unwrap().take() {
                return Err(err);
            }
            let mut orders = self.orders.lock().unwrap();
            if orders.iter().any(|o| o.payment_intent == insert.payment_intent) {
                return Err(StoreError::conflict(PAYMENT_INTENT_CONSTRAINT));
            }
            let order = OrderRecord {
                order_number: orders.len() as i32 + 1,
                payment_intent: insert.payment_intent,
                payment_status: insert.payment_status,
                cart_items: Json(insert.cart_items),
                shipping: Json(insert.shipping),
                subtotal_amt: insert.amounts.subtotal_amt,
                tax_amt: insert.amounts.tax_amt,
                shipping_amt: insert.amounts.shipping_amt,
                total_amt: insert.amounts.total_amt,
                fulfillment_status: FulfillmentStatus::Unfulfilled,
                user_id: insert.user_id,
                created_at: time::macros::datetime!(2024-01-01 00:00:00),
            };
            orders.push(order.clone());
            let mut race = self.race.lock().unwrap();
            if *race {
                *race = false;
                return Err(StoreError::conflict(PAYMENT_INTENT_CONSTRAINT));
            }
            Ok(order)
        }
    }

    fn cart() -> Vec<CartItem> {
        vec![
            CartItem {
                price: Decimal::from(100),
                quantity: 2,
                product_title: "Aurora Ring".to_string(),
            },
            CartItem {
                price: Decimal::from(50),
                quantity: 1,
                product_title: "Daria Studs".to_string(),
            },
        ]
    }

    fn request(cart_items: Vec<CartItem>) -> ReconcileCheckout {
        ReconcileCheckout {
            session_id: "cs_test_1".to_string(),
            cart_items,
            buyer_info: json!({"name": "Jane Doe", "city": "Dubai"}),
            user_id: Some(7),
        }
    }

    #[tokio::test]
    async fn test_first_reconciliation_creates_order() {
        let gateway = FakeGateway::paid("pi_1", 2000);
        let store = FakeStore::default();

        let result = reconcile_checkout(&gateway, &store, request(cart()))
            .await
            .unwrap();
        let Reconciliation::Created(order) = result else {
            panic!("expected a created order");
        };
        assert_eq!(order.payment_intent, "pi_1");
        assert_eq!(order.payment_status, "paid");
        assert_eq!(order.subtotal_amt, Decimal::from(250));
        assert_eq!(order.tax_amt, Decimal::from(13));
        assert_eq!(order.shipping_amt, Decimal::from(20));
        assert_eq!(order.total_amt, Decimal::from(270));
        assert_eq!(order.shipping.0.shipping_method, "standard");
        assert_eq!(order.shipping.0.shipping_address["city"], "Dubai");
        assert_eq!(order.user_id, Some(7));
    }

    #[tokio::test]
    async fn test_replay_returns_stored_order_as_duplicate() {
        let gateway = FakeGateway::paid("pi_1", 2000);
        let store = FakeStore::default();

        reconcile_checkout(&gateway, &store, request(cart()))
            .await
            .unwrap();

        // The replay carries a different cart; the stored one wins.
        let replay_cart = vec![CartItem {
            price: Decimal::from(1),
            quantity: 1,
            product_title: "Something else".to_string(),
        }];
        let result = reconcile_checkout(&gateway, &store, request(replay_cart))
            .await
            .unwrap();

        let Reconciliation::Duplicate(order, amounts) = result else {
            panic!("expected a duplicate");
        };
        assert_eq!(store.orders.lock().unwrap().len(), 1);
        assert_eq!(order.order_number, 1);
        assert_eq!(amounts.subtotal_amt, Decimal::from(250));
        assert_eq!(amounts.total_amt, Decimal::from(270));
    }

    #[tokio::test]
    async fn test_lost_race_becomes_duplicate() {
        let gateway = FakeGateway::paid("pi_race", 0);
        let store = FakeStore {
            race: Mutex::new(true),
            ..FakeStore::default()
        };

        let result = reconcile_checkout(&gateway, &store, request(cart()))
            .await
            .unwrap();

        assert!(matches!(result, Reconciliation::Duplicate(_, _)));
        assert_eq!(result.order().payment_intent, "pi_race");
        assert_eq!(store.orders.lock().unwrap().len(), 1);
        // One lookup before the insert, one after the conflict.
        assert_eq!(store.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_other_conflicts_are_not_duplicates() {
        let gateway = FakeGateway::paid("pi_orphan", 0);
        let store = FakeStore {
            reject: Mutex::new(Some(StoreError::conflict("orders_user_id_fkey"))),
            ..FakeStore::default()
        };

        let err = reconcile_checkout(&gateway, &store, request(cart()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Store(StoreError::Conflict { ref constraint })
                if constraint.as_deref() == Some("orders_user_id_fkey")
        ));
        // No second lookup for a winner that does not exist.
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_without_intent_is_incomplete() {
        let gateway = FakeGateway::with(Ok(CheckoutSessionStatus {
            payment_intent: None,
            payment_status: "unpaid".to_string(),
            shipping_amount_minor: 0,
        }));
        let store = FakeStore::default();

        let err = reconcile_checkout(&gateway, &store, request(cart()))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::PaymentIncomplete(ref id) if id == "cs_test_1"));
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gateway_error_propagates() {
        let gateway = FakeGateway::with(Err(PaymentError::Api {
            status: 404,
            message: "No such checkout.session".to_string(),
        }));
        let store = FakeStore::default();

        let err = reconcile_checkout(&gateway, &store, request(cart()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Payment(PaymentError::Api { status: 404, .. })
        ));
        assert!(store.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_cart_is_rejected_before_any_call() {
        let gateway = FakeGateway::paid("pi_1", 0);
        let store = FakeStore::default();
        let bad_cart = vec![CartItem {
            price: Decimal::from(-1),
            quantity: 1,
            product_title: "Aurora Ring".to_string(),
        }];

        let err = reconcile_checkout(&gateway, &store, request(bad_cart))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }
}
