use aurora_core::entities::products::{
    CreateProduct, DeleteProduct, GetProductById, ListProducts, UpdateProduct,
};
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::catalog::{ProductBody, ProductResponse};
use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;

use crate::api::extractors::ValidJson;
use crate::api::{ApiError, ApiResult, CreatedResult, conflict_as, created, ok};
use crate::state::AppState;

const NOT_FOUND: ApiError = ApiError::NotFound("Product not found.");
const MISSING_REFERENCE: &str = "Collection or category does not exist.";

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ProductResponse>> {
    let records = state.db.process(ListProducts).await?;
    ok(records.into_iter().map(Into::into).collect())
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<ProductResponse> {
    let record = state
        .db
        .process(GetProductById { id })
        .await?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ProductBody>,
) -> CreatedResult<ProductResponse> {
    let product_title = body.require_title()?.to_string();
    let product_price = body.require_price()?;
    let record = state
        .db
        .process(CreateProduct {
            product_title,
            product_description: body.product_description,
            product_price,
            product_types: body.product_types,
            product_tags: body.product_tags.unwrap_or_default(),
            published: body.published.unwrap_or(false),
            product_size: body.product_size.unwrap_or_default(),
            gold_color: body.gold_color.unwrap_or_default(),
            enamel_colors: body.enamel_colors.unwrap_or_default(),
            hook_options: body.hook_options.unwrap_or_default(),
            product_images: body.product_images.unwrap_or_default(),
            collection_id: body.collection_id,
            category_id: body.category_id,
        })
        .await
        .map_err(conflict_as(MISSING_REFERENCE))?;
    tracing::info!(product_id = record.product_id, "Product created");
    created("Product created.", record.into())
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidJson(changes): ValidJson<ProductBody>,
) -> ApiResult<ProductResponse> {
    let record = state
        .db
        .process(UpdateProduct { id, changes })
        .await
        .map_err(conflict_as(MISSING_REFERENCE))?
        .ok_or(NOT_FOUND)?;
    ok(record.into())
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.db.process(DeleteProduct { id }).await? {
        return Err(NOT_FOUND);
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(ApiResponse::message("Product deleted.")))
}
