#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header::CONTENT_TYPE};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tower::ServiceExt;

use catalog_back::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, UploadConfig};
use catalog_back::error::{AppError, Result};
use catalog_back::models::{Category, NormalizedProduct, Product, ProductResponse};
use catalog_back::repository::{CategoryRepository, ProductRepository};
use catalog_back::services::{BlobStore, ProductService};
use catalog_back::{AppState, app};

// ---------------------------------------------------------------------------
// In-memory catalog
// ---------------------------------------------------------------------------

struct StoredProduct {
    product: Product,
    images: Vec<String>,
    category_ids: Vec<i32>,
}

#[derive(Default)]
struct CatalogState {
    next_product_id: i32,
    next_category_id: i32,
    products: BTreeMap<i32, StoredProduct>,
    categories: BTreeMap<i32, Category>,
    failing_categories: HashSet<i32>,
    fail_writes: bool,
    fail_category_listing: bool,
    offline: bool,
    fail_reads_after_write: bool,
    reads_broken: bool,
}

/// Product and category store backed by ordered maps.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_category(&self, name: &str) -> Category {
        let mut state = self.state.lock().unwrap();
        state.next_category_id += 1;
        let category = Category {
            id: state.next_category_id,
            name: name.to_string(),
        };
        state.categories.insert(category.id, category.clone());
        category
    }

    /// Seeds a category with a fixed id.
    pub fn seed_category_with_id(&self, id: i32, name: &str) -> Category {
        let mut state = self.state.lock().unwrap();
        state.next_category_id = state.next_category_id.max(id);
        let category = Category {
            id,
            name: name.to_string(),
        };
        state.categories.insert(id, category.clone());
        category
    }

    pub fn fail_lookups_for_category(&self, category_id: i32) {
        self.state
            .lock()
            .unwrap()
            .failing_categories
            .insert(category_id);
    }

    pub fn fail_writes(&self) {
        self.state.lock().unwrap().fail_writes = true;
    }

    pub fn fail_category_listing(&self) {
        self.state.lock().unwrap().fail_category_listing = true;
    }

    /// Lookups by id start failing once the next insert or update commits.
    pub fn fail_reads_after_write(&self) {
        self.state.lock().unwrap().fail_reads_after_write = true;
    }

    pub fn stored_images(&self, id: i32) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .products
            .get(&id)
            .map(|stored| stored.images.clone())
            .unwrap_or_default()
    }

    pub fn go_offline(&self) {
        self.state.lock().unwrap().offline = true;
    }

    pub fn product_count(&self) -> usize {
        self.state.lock().unwrap().products.len()
    }

    fn view(state: &CatalogState, stored: &StoredProduct) -> ProductResponse {
        let mut categories: Vec<Category> = stored
            .category_ids
            .iter()
            .filter_map(|id| state.categories.get(id).cloned())
            .collect();
        categories.sort_by_key(|c| c.id);

        ProductResponse {
            product: stored.product.clone(),
            images: stored.images.clone(),
            categories,
        }
    }

    fn collect<F>(&self, keep: F) -> Vec<ProductResponse>
    where
        F: Fn(&StoredProduct) -> bool,
    {
        let state = self.state.lock().unwrap();
        state
            .products
            .values()
            .filter(|stored| keep(stored))
            .map(|stored| Self::view(&state, stored))
            .collect()
    }
}

fn backend_failure(what: &str) -> AppError {
    AppError::InternalError(format!("simulated {} failure", what))
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn insert(&self, product: &NormalizedProduct) -> Result<i32> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(backend_failure("insert"));
        }

        state.next_product_id += 1;
        let id = state.next_product_id;
        let now = Utc::now();

        state.products.insert(
            id,
            StoredProduct {
                product: Product {
                    id,
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: product.price,
                    discount: product.discount,
                    created_at: now,
                    updated_at: now,
                },
                images: product.images.clone(),
                category_ids: product.category_ids.clone(),
            },
        );
        state.reads_broken = state.fail_reads_after_write;

        Ok(id)
    }

    async fn update(&self, id: i32, product: &NormalizedProduct) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(backend_failure("update"));
        }

        let Some(stored) = state.products.get_mut(&id) else {
            return Ok(false);
        };

        stored.product.name = product.name.clone();
        stored.product.description = product.description.clone();
        stored.product.price = product.price;
        stored.product.discount = product.discount;
        stored.product.updated_at = Utc::now();
        stored.images.extend(product.images.iter().cloned());
        stored.category_ids = product.category_ids.clone();
        state.reads_broken = state.fail_reads_after_write;

        Ok(true)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductResponse>> {
        let state = self.state.lock().unwrap();
        if state.reads_broken {
            return Err(backend_failure("lookup"));
        }
        Ok(state
            .products
            .get(&id)
            .map(|stored| Self::view(&state, stored)))
    }

    async fn find_all(&self) -> Result<Vec<ProductResponse>> {
        Ok(self.collect(|_| true))
    }

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<ProductResponse>> {
        if self
            .state
            .lock()
            .unwrap()
            .failing_categories
            .contains(&category_id)
        {
            return Err(backend_failure("category lookup"));
        }

        Ok(self.collect(|stored| stored.category_ids.contains(&category_id)))
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<ProductResponse>> {
        let needle = fragment.to_lowercase();
        Ok(self.collect(|stored| stored.product.name.to_lowercase().contains(&needle)))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        Ok(self.state.lock().unwrap().products.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        if self.state.lock().unwrap().offline {
            return Err(backend_failure("ping"));
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Category>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .categories
            .values()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Category>> {
        let state = self.state.lock().unwrap();
        if state.fail_category_listing {
            return Err(backend_failure("category listing"));
        }
        Ok(state.categories.values().cloned().collect())
    }

    async fn create(&self, name: &str) -> Result<Category> {
        Ok(self.seed_category(name))
    }
}

// ---------------------------------------------------------------------------
// In-memory blob store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryBlobStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.files.lock().unwrap().contains_key(filename)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, filename: &str, data: &[u8]) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), data.to_vec());
        Ok(())
    }

    async fn remove(&self, filename: &str) -> Result<()> {
        self.files.lock().unwrap().remove(filename);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub const MAX_FILES: usize = 10;

pub fn build_service(catalog: Arc<InMemoryCatalog>, blobs: Arc<MemoryBlobStore>) -> ProductService {
    ProductService::new(catalog.clone(), catalog, blobs, MAX_FILES)
}

pub fn normalized(name: &str, price: Decimal, images: &[&str], category_ids: &[i32]) -> NormalizedProduct {
    NormalizedProduct {
        name: name.to_string(),
        price,
        description: String::new(),
        discount: None,
        images: images.iter().map(|s| s.to_string()).collect(),
        category_ids: category_ids.to_vec(),
    }
}

/// Safe defaults for router construction; the database is never contacted.
pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_body_size: 10 * 1024 * 1024,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/unused".to_string(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        },
        uploads: UploadConfig {
            dir: std::env::temp_dir().join("catalog-back-tests"),
            max_files: MAX_FILES,
        },
    }
}

pub fn build_test_app(catalog: Arc<InMemoryCatalog>, blobs: Arc<MemoryBlobStore>) -> Router {
    let state = AppState::new(build_service(catalog, blobs));
    app::router(state, &test_config()).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "catalog-test-boundary";

/// Encodes text fields and `images` file parts (filename, contents) as
/// multipart/form-data.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    for (filename, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str)],
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, files)))
        .unwrap();

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
