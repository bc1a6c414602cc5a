//! Admin API handlers.
//!
//! Every route is behind [`require_admin`], which checks that the session
//! belongs to an account that is still an admin before the handler runs.
//!
//! # Endpoints
//!
//! - `GET|POST /main-collections`, `GET|PUT|DELETE /main-collections/{id}`
//! - `GET|POST /collections`, `GET|PUT|DELETE /collections/{id}`
//! - `GET /collections/select/{product_id}` – collection picker for a product
//! - `GET|POST /categories`, `GET|PUT|DELETE /categories/{id}`
//! - `GET|POST /products`, `GET|PUT|DELETE /products/{id}`
//! - `DELETE /{kind}/delete-image/{public_id}` – remove an image from the media host
//! - `GET /orders`, `GET /orders/{order_number}`, `PUT /orders/{order_number}/fulfillment`
//! - `GET /users`, `GET|DELETE /users/{id}`
//! - `GET|POST|PUT|DELETE /conditions`

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, put},
};

use super::extractors::AdminSession;
use crate::state::AppState;

mod categories;
mod collections;
mod conditions;
mod images;
mod main_collections;
mod orders;
mod products;
mod users;

/// Path prefixes of the entities that carry images.
const IMAGE_KINDS: [&str; 4] = ["main-collections", "collections", "categories", "products"];

/// Build the Admin API router.
pub fn router(state: AppState) -> Router<AppState> {
    let mut router = Router::new()
        .route(
            "/main-collections",
            get(main_collections::list).post(main_collections::create),
        )
        .route(
            "/main-collections/{id}",
            get(main_collections::get_one)
                .put(main_collections::update)
                .delete(main_collections::remove),
        )
        .route(
            "/collections",
            get(collections::list).post(collections::create),
        )
        .route(
            "/collections/{id}",
            get(collections::get_one)
                .put(collections::update)
                .delete(collections::remove),
        )
        .route(
            "/collections/select/{product_id}",
            get(collections::select_for_product),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get_one)
                .put(categories::update)
                .delete(categories::remove),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get_one)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/orders", get(orders::list))
        .route("/orders/{order_number}", get(orders::get_one))
        .route(
            "/orders/{order_number}/fulfillment",
            put(orders::update_fulfillment),
        )
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::get_one).delete(users::remove))
        .route(
            "/conditions",
            get(conditions::get_one)
                .post(conditions::create)
                .put(conditions::update)
                .delete(conditions::remove),
        );

    for kind in IMAGE_KINDS {
        router = router.route(
            &format!("/{kind}/delete-image/{{*public_id}}"),
            delete(images::delete_image),
        );
    }

    router.route_layer(middleware::from_fn_with_state(state, require_admin))
}

/// Reject requests without an admin session before routing them on.
async fn require_admin(_admin: AdminSession, request: Request, next: Next) -> Response {
    next.run(request).await
}
