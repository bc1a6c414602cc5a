//! The terms-and-conditions document. Section texts arrive with `|` as a
//! line separator, which is stored as a space.

use aurora_core::entities::conditions::{
    CreateConditions, DeleteConditions, GetConditions, UpdateConditions,
};
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::conditions::{ConditionsBody, ConditionsResponse};
use axum::{Json, extract::State};
use kanau::processor::Processor;

use crate::api::extractors::JsonBody;
use crate::api::{ApiError, ApiResult, CreatedResult, conflict_as, created, ok};
use crate::state::AppState;

const NOT_FOUND: ApiError = ApiError::NotFound("Conditions not found.");

pub async fn get_one(State(state): State<AppState>) -> ApiResult<ConditionsResponse> {
    let record = state.db.process(GetConditions).await?.ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ConditionsBody>,
) -> CreatedResult<ConditionsResponse> {
    let record = state
        .db
        .process(CreateConditions {
            body: body.normalized(),
        })
        .await
        .map_err(conflict_as("Conditions already exist."))?;
    created("Conditions created.", record.into())
}

pub async fn update(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ConditionsBody>,
) -> ApiResult<ConditionsResponse> {
    let record = state
        .db
        .process(UpdateConditions {
            changes: body.normalized(),
        })
        .await?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn remove(State(state): State<AppState>) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.db.process(DeleteConditions).await? {
        return Err(NOT_FOUND);
    }
    Ok(Json(ApiResponse::message("Conditions deleted.")))
}
