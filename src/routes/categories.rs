use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::Result,
    models::{Category, CategoryGroup, CreateCategoryRequest},
};

pub async fn get_all_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.products.list_categories().await?;

    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.products.create_category(&payload.name).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_storefront(State(state): State<AppState>) -> Json<Vec<CategoryGroup>> {
    Json(state.storefront.grouped_view().await)
}
