use aurora_core::entities::orders::ListOrdersForUser;
use aurora_core::entities::users::{DeleteUser, GetUserById, ListUsers, UserListRow};
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::admin::{
    AdminOrderInfo, AdminUserDetail, AdminUserInfo, AdminUserRow, PageQuery, display_name,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use kanau::processor::Processor;

use crate::api::extractors::AdminSession;
use crate::api::{ApiError, ApiResult, ok};
use crate::state::AppState;

const NOT_FOUND: ApiError = ApiError::NotFound("User not found.");

fn to_row(row: UserListRow) -> AdminUserRow {
    AdminUserRow {
        id: row.id,
        name: display_name(row.first_name.as_deref(), row.last_name.as_deref()),
        email: row.email,
        primary_address: (&row.addresses.0).into(),
        order_count: row.order_count,
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Vec<AdminUserRow>> {
    let (limit, offset) = page.clamped();
    let rows = state.db.process(ListUsers { limit, offset }).await?;
    ok(rows.into_iter().map(to_row).collect())
}

/// `GET /users/{id}`: The customer, their address and their orders with
/// the total spent.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<AdminUserDetail> {
    let user = state
        .db
        .process(GetUserById { id })
        .await?
        .ok_or(NOT_FOUND)?;
    let orders = state.db.process(ListOrdersForUser { user_id: id }).await?;

    ok(AdminUserDetail {
        user_info: AdminUserInfo {
            id: user.id,
            name: display_name(user.first_name.as_deref(), user.last_name.as_deref()),
            email: user.email,
            primary_address: user.addresses.0,
        },
        order_info: AdminOrderInfo::from_orders(orders.iter().map(|o| o.summary()).collect()),
    })
}

/// `DELETE /users/{id}`: Orders of the user are kept and lose their owner.
pub async fn remove(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if admin.sub == id {
        return Err(ApiError::Validation(
            "You cannot delete your own account.".to_string(),
        ));
    }
    if !state.db.process(DeleteUser { id }).await? {
        return Err(NOT_FOUND);
    }
    tracing::info!(user_id = id, "User deleted");
    Ok(Json(ApiResponse::message("User deleted.")))
}
