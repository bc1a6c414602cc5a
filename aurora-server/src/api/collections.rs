//! Public collection pages.
//!
//! # Endpoints
//!
//! - `GET  /main/{main_jewelry_title}`  – a main collection, its collections and all categories
//! - `GET  /collection/collections`     – every collection with its products
//! - `GET  /{collection_name}`          – a collection with its products
//! - `POST /browse`                     – main collections matching a name

use std::collections::HashMap;

use aurora_core::entities::categories::ListCategories;
use aurora_core::entities::collections::{
    GetCollectionByName, ListCollections, ListCollectionsInMainCollection,
};
use aurora_core::entities::main_collections::{GetMainCollectionByName, SearchMainCollections};
use aurora_core::entities::products::{ListProductCards, ListProductsInCollection, ProductCardRow};
use aurora_sdk::objects::catalog::{
    BrowseRequest, CollectionPage, CollectionWithProducts, MainCollectionPage,
    MainCollectionResponse, MainCollectionWithCollections, NamedRef,
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

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/main/{main_jewelry_title}", get(main_collection_page))
        .route("/collection/collections", get(collections_with_products))
        .route("/browse", post(browse_main_collections))
        .route("/{collection_name}", get(collection_page))
}

/// Page slugs use dashes where the stored name has spaces.
fn title_from_slug(slug: &str) -> String {
    slug.trim().replace('-', " ")
}

async fn main_collection_page(
    State(state): State<AppState>,
    Path(main_jewelry_title): Path<String>,
) -> ApiResult<MainCollectionPage> {
    let main = state
        .db
        .process(GetMainCollectionByName {
            name: title_from_slug(&main_jewelry_title),
        })
        .await?
        .ok_or(ApiError::NotFound("Main collection not found."))?;
    let collections = state
        .db
        .process(ListCollectionsInMainCollection {
            main_collection_id: main.id,
        })
        .await?;
    let categories = state.db.process(ListCategories).await?;

    ok(MainCollectionPage {
        main_jewelry: MainCollectionWithCollections {
            id: main.id,
            name: main.name,
            description: main.description,
            collections: collections.iter().map(|c| c.tile()).collect(),
        },
        category: categories.into_iter().map(Into::into).collect(),
    })
}

async fn collection_page(
    State(state): State<AppState>,
    Path(collection_name): Path<String>,
) -> ApiResult<CollectionPage> {
    let collection = state
        .db
        .process(GetCollectionByName {
            name: title_from_slug(&collection_name),
        })
        .await?
        .ok_or(ApiError::NotFound("Collection not found."))?;
    let products = state
        .db
        .process(ListProductsInCollection {
            collection_id: collection.id,
        })
        .await?;
    let categories = state.db.process(ListCategories).await?;

    ok(CollectionPage {
        collection: CollectionWithProducts {
            id: collection.id,
            name: collection.name,
            description: collection.description,
            status: collection.status,
            image: collection.image.map(|image| image.0),
            products: products.into_iter().map(Into::into).collect(),
        },
        categories: categories
            .into_iter()
            .map(|c| NamedRef { name: c.name })
            .collect(),
    })
}

/// `GET /collection/collections`: Products are read once and grouped here,
/// most expensive first within each collection.
async fn collections_with_products(
    State(state): State<AppState>,
) -> ApiResult<Vec<CollectionWithProducts>> {
    let collections = state.db.process(ListCollections).await?;
    let products = state.db.process(ListProductCards).await?;

    let mut by_collection: HashMap<i32, Vec<ProductCardRow>> = HashMap::new();
    for product in products {
        if let Some(collection_id) = product.collection_id {
            by_collection.entry(collection_id).or_default().push(product);
        }
    }

    let response = collections
        .into_iter()
        .map(|collection| {
            let mut products = by_collection.remove(&collection.id).unwrap_or_default();
            products.sort_by(|a, b| {
                b.product_price
                    .cmp(&a.product_price)
                    .then(a.product_id.cmp(&b.product_id))
            });
            CollectionWithProducts {
                id: collection.id,
                name: collection.name,
                description: collection.description,
                status: collection.status,
                image: collection.image.map(|image| image.0),
                products: products.into_iter().map(Into::into).collect(),
            }
        })
        .collect();
    ok(response)
}

/// `POST /browse`: `all`, blank or very short names list every main
/// collection.
async fn browse_main_collections(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<BrowseRequest>,
) -> ApiResult<Vec<MainCollectionResponse>> {
    let name = request.main_collection_filter().map(str::to_owned);
    let main_collections = state.db.process(SearchMainCollections { name }).await?;
    ok(main_collections.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("fine-jewelry"), "fine jewelry");
        assert_eq!(title_from_slug(" rings "), "rings");
    }
}
