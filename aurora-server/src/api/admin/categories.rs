use aurora_core::entities::categories::{
    CreateCategory, DeleteCategory, GetCategoryById, ListCategories, UpdateCategory,
};
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::catalog::{CategoryBody, CategoryResponse};
use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;

use crate::api::extractors::ValidJson;
use crate::api::{ApiError, ApiResult, CreatedResult, conflict_as, created, ok};
use crate::state::AppState;

const NOT_FOUND: ApiError = ApiError::NotFound("Category not found.");
const EXISTS: &str = "Category already exists.";

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CategoryResponse>> {
    let records = state.db.process(ListCategories).await?;
    ok(records.into_iter().map(Into::into).collect())
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<CategoryResponse> {
    let record = state
        .db
        .process(GetCategoryById { id })
        .await?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CategoryBody>,
) -> CreatedResult<CategoryResponse> {
    let name = body.require_name()?.to_string();
    let record = state
        .db
        .process(CreateCategory {
            name,
            image: body.image,
        })
        .await
        .map_err(conflict_as(EXISTS))?;
    tracing::info!(id = record.id, "Category created");
    created("Category created.", record.into())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(changes): ValidJson<CategoryBody>,
) -> ApiResult<CategoryResponse> {
    let record = state
        .db
        .process(UpdateCategory { id, changes })
        .await
        .map_err(conflict_as(EXISTS))?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.db.process(DeleteCategory { id }).await? {
        return Err(NOT_FOUND);
    }
    tracing::info!(id, "Category deleted");
    Ok(Json(ApiResponse::message("Category deleted.")))
}
