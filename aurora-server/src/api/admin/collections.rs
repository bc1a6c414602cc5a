use aurora_core::entities::collections::{
    CreateCollection, DeleteCollection, GetCollectionById, ListCollectionOptions, ListCollections,
    UpdateCollection,
};
use aurora_core::entities::products::GetProductById;
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::catalog::{CollectionBody, CollectionResponse, CollectionSelect};
use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;

use crate::api::extractors::ValidJson;
use crate::api::{ApiError, ApiResult, CreatedResult, conflict_as, created, ok};
use crate::state::AppState;

const NOT_FOUND: ApiError = ApiError::NotFound("Collection not found.");
const EXISTS: &str = "Collection already exists.";

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CollectionResponse>> {
    let records = state.db.process(ListCollections).await?;
    ok(records.into_iter().map(Into::into).collect())
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<CollectionResponse> {
    let record = state
        .db
        .process(GetCollectionById { id })
        .await?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

/// `GET /collections/select/{product_id}`: All collection options plus the
/// collection the product currently belongs to.
pub async fn select_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> ApiResult<CollectionSelect> {
    let product = state
        .db
        .process(GetProductById { id: product_id })
        .await?
        .ok_or(ApiError::NotFound("Product not found."))?;
    let options = state.db.process(ListCollectionOptions).await?;
    ok(CollectionSelect {
        collections: options.into_iter().map(Into::into).collect(),
        collection_id: product.collection_id,
    })
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CollectionBody>,
) -> CreatedResult<CollectionResponse> {
    let name = body.require_name()?.to_string();
    let record = state
        .db
        .process(CreateCollection {
            name,
            description: body.description,
            status: body.status,
            image: body.image,
            main_collection_id: body.main_collection_id,
        })
        .await
        .map_err(conflict_as(
            "Collection already exists or its main collection is missing.",
        ))?;
    tracing::info!(id = record.id, "Collection created");
    created("Collection created.", record.into())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(changes): ValidJson<CollectionBody>,
) -> ApiResult<CollectionResponse> {
    let record = state
        .db
        .process(UpdateCollection { id, changes })
        .await
        .map_err(conflict_as(EXISTS))?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.db.process(DeleteCollection { id }).await? {
        return Err(NOT_FOUND);
    }
    tracing::info!(id, "Collection deleted");
    Ok(Json(ApiResponse::message("Collection deleted.")))
}
