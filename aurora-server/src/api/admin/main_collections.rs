use aurora_core::entities::main_collections::{
    CreateMainCollection, DeleteMainCollection, GetMainCollectionById, ListMainCollections,
    UpdateMainCollection,
};
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::catalog::{MainCollectionBody, MainCollectionResponse};
use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;

use crate::api::extractors::ValidJson;
use crate::api::{ApiError, ApiResult, CreatedResult, conflict_as, created, ok};
use crate::state::AppState;

const NOT_FOUND: ApiError = ApiError::NotFound("Main collection not found.");
const EXISTS: &str = "Main collection already exists.";

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<MainCollectionResponse>> {
    let records = state.db.process(ListMainCollections).await?;
    ok(records.into_iter().map(Into::into).collect())
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<MainCollectionResponse> {
    let record = state
        .db
        .process(GetMainCollectionById { id })
        .await?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<MainCollectionBody>,
) -> CreatedResult<MainCollectionResponse> {
    let name = body.require_name()?.to_string();
    let record = state
        .db
        .process(CreateMainCollection {
            name,
            status: body.status,
            description: body.description,
            image: body.image,
        })
        .await
        .map_err(conflict_as(EXISTS))?;
    tracing::info!(id = record.id, "Main collection created");
    created("Main collection created.", record.into())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(changes): ValidJson<MainCollectionBody>,
) -> ApiResult<MainCollectionResponse> {
    let record = state
        .db
        .process(UpdateMainCollection { id, changes })
        .await
        .map_err(conflict_as(EXISTS))?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.db.process(DeleteMainCollection { id }).await? {
        return Err(NOT_FOUND);
    }
    tracing::info!(id, "Main collection deleted");
    Ok(Json(ApiResponse::message("Main collection deleted.")))
}
