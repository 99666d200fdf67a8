use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    config::{AppConfig, UPLOADS_MOUNT},
    database,
    error::{AppError, Result},
    repository::PgCatalogRepository,
    routes,
    services::{DiskBlobStore, ProductService, StorefrontService},
};

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub storefront: StorefrontService,
}

impl AppState {
    pub fn new(products: ProductService) -> Self {
        Self {
            storefront: StorefrontService::new(products.clone()),
            products,
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let repository = Arc::new(PgCatalogRepository::new(pool));
    let blobs = Arc::new(DiskBlobStore::open(&config.uploads.dir).await?);

    let products = ProductService::new(
        repository.clone(),
        repository,
        blobs,
        config.uploads.max_files,
    );

    router(AppState::new(products), config)
}

/// Wires routes, static uploads and middleware around an existing state.
pub fn router(state: AppState, config: &AppConfig) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let app = routes::create_router()
        .nest_service(UPLOADS_MOUNT, ServeDir::new(&config.uploads.dir))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}
