use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    AppState,
    error::Result,
    models::{ProductResponse, ProductSearchQuery},
    utils::extractors::{IdParam, read_product_form},
};

pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let form = read_product_form(multipart).await?;
    let product = state.products.create_from_form(form).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.products.find_all().await?;

    Ok(Json(products))
}

pub async fn get_products_by_category(
    State(state): State<AppState>,
    IdParam(category_id): IdParam,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.products.find_by_category(category_id).await?;

    Ok(Json(products))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<ProductSearchQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let products = state
        .products
        .search_products(params.name.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<ProductResponse>> {
    let product = state.products.find_one(id).await?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    IdParam(id): IdParam,
    multipart: Multipart,
) -> Result<Json<ProductResponse>> {
    let form = read_product_form(multipart).await?;
    let product = state.products.update_from_form(id, form).await?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<Value>> {
    state.products.delete_product(id).await?;

    Ok(Json(json!({ "deleted": id })))
}
