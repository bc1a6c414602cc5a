//! The signed-in customer's dashboard.
//!
//! # Endpoints
//!
//! - `POST /overview`             – profile and order history
//! - `PUT  /changeAddress`        – update the stored address
//! - `PUT  /deleteAddress`        – clear the stored address
//! - `GET  /conditions/condition` – terms and conditions

use aurora_core::entities::conditions::GetConditions;
use aurora_core::entities::orders::ListOrdersForUser;
use aurora_core::entities::users::UpdateUserAddresses;
use aurora_sdk::objects::conditions::ConditionsResponse;
use aurora_sdk::objects::user::{AddressBook, AddressUpdate, CustomerOverview, UserProfile};
use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use kanau::processor::Processor;

use super::extractors::{SessionUser, ValidJson};
use super::{ApiError, ApiResult, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", post(overview))
        .route("/changeAddress", put(change_address))
        .route("/deleteAddress", put(delete_address))
        .route("/conditions/condition", get(conditions))
}

async fn overview(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<CustomerOverview> {
    let orders = state
        .db
        .process(ListOrdersForUser {
            user_id: session.id(),
        })
        .await?;
    ok(CustomerOverview {
        profile: session.user.profile(),
        orders: orders.iter().map(|order| order.summary()).collect(),
    })
}

async fn store_addresses(
    state: &AppState,
    user_id: i32,
    addresses: AddressBook,
) -> ApiResult<UserProfile> {
    let user = state
        .db
        .process(UpdateUserAddresses {
            id: user_id,
            addresses,
        })
        .await?
        .ok_or(ApiError::NotFound("User not found."))?;
    ok(user.profile())
}

/// `PUT /changeAddress`: Blank or missing fields keep their stored value.
async fn change_address(
    State(state): State<AppState>,
    session: SessionUser,
    ValidJson(update): ValidJson<AddressUpdate>,
) -> ApiResult<UserProfile> {
    let addresses = session.user.addresses.0.merged(&update);
    store_addresses(&state, session.id(), addresses).await
}

async fn delete_address(
    State(state): State<AppState>,
    session: SessionUser,
) -> ApiResult<UserProfile> {
    store_addresses(&state, session.id(), AddressBook::default()).await
}

async fn conditions(
    State(state): State<AppState>,
    _session: SessionUser,
) -> ApiResult<ConditionsResponse> {
    let conditions = state
        .db
        .process(GetConditions)
        .await?
        .ok_or(ApiError::NotFound("Conditions not found."))?;
    ok(conditions.into())
}
