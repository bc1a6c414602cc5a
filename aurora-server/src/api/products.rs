//! Public product pages.
//!
//! # Endpoints
//!
//! - `GET  /`                          – all product cards and category names
//! - `GET  /new-arrivals`              – the latest products
//! - `GET  /{product_id}`              – one product
//! - `POST /search`                    – search by title or type
//! - `GET  /category/{category_type}`  – a category with its products

use aurora_core::entities::categories::{GetCategoryByName, ListCategories};
use aurora_core::entities::collections::ListCollections;
use aurora_core::entities::products::{
    GetProductById, ListNewArrivals, ListProductCards, ListProductsInCategory, SearchProducts,
};
use aurora_sdk::objects::catalog::{
    CategoryPage, CategoryWithProducts, NamedRef, ProductCard, ProductListing, ProductResponse,
    SearchRequest,
};
use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use kanau::processor::Processor;

use super::extractors::JsonBody;
use super::{ApiError, ApiResult, ok};
use crate::state::AppState;

/// Number of products on the new-arrivals shelf.
const NEW_ARRIVALS: i64 = 6;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/new-arrivals", get(new_arrivals))
        .route("/search", post(search_products))
        .route("/category/{category_type}", get(category_page))
        .route("/{product_id}", get(get_product))
}

/// `GET /`: Every product card plus the category names for the filter bar.
async fn list_products(State(state): State<AppState>) -> ApiResult<ProductListing> {
    let products = state.db.process(ListProductCards).await?;
    let categories = state.db.process(ListCategories).await?;
    ok(ProductListing {
        products: products.into_iter().map(Into::into).collect(),
        categories: categories
            .into_iter()
            .map(|c| NamedRef { name: c.name })
            .collect(),
    })
}

async fn new_arrivals(State(state): State<AppState>) -> ApiResult<Vec<ProductCard>> {
    let products = state
        .db
        .process(ListNewArrivals {
            limit: NEW_ARRIVALS,
        })
        .await?;
    ok(products.into_iter().map(Into::into).collect())
}

async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> ApiResult<ProductResponse> {
    let product = state
        .db
        .process(GetProductById { id: product_id })
        .await?
        .ok_or(ApiError::NotFound("Product not found."))?;
    ok(product.into())
}

/// `POST /search`: Queries shorter than four characters match nothing.
async fn search_products(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SearchRequest>,
) -> ApiResult<Vec<ProductCard>> {
    let Some(query) = request.normalized() else {
        return ok(Vec::new());
    };
    let products = state.db.process(SearchProducts { query }).await?;
    ok(products.into_iter().map(Into::into).collect())
}

async fn category_page(
    State(state): State<AppState>,
    Path(category_type): Path<String>,
) -> ApiResult<CategoryPage> {
    let category = state
        .db
        .process(GetCategoryByName {
            name: category_type.trim().to_string(),
        })
        .await?
        .ok_or(ApiError::NotFound("Category not found."))?;
    let products = state
        .db
        .process(ListProductsInCategory {
            category_id: category.id,
        })
        .await?;
    let collections = state.db.process(ListCollections).await?;

    ok(CategoryPage {
        category: CategoryWithProducts {
            name: category.name,
            products: products.into_iter().map(Into::into).collect(),
        },
        collection: collections
            .into_iter()
            .map(|c| NamedRef { name: c.name })
            .collect(),
    })
}
