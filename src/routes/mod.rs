mod categories;
mod health;
mod products;

use axum::{Router, routing::get};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/products",
            get(products::get_products).post(products::create_product),
        )
        .route("/products/search", get(products::search_products))
        .route(
            "/products/category/{id}",
            get(products::get_products_by_category),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/categories",
            get(categories::get_all_categories).post(categories::create_category),
        )
        .route("/storefront", get(categories::get_storefront))
}
