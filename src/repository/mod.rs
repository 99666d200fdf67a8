mod postgres;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{Category, NormalizedProduct, ProductResponse},
};

pub use postgres::PgCatalogRepository;

/// Product records with their image and category edges.
///
/// `insert` and `update` must apply all of their sub-steps atomically.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Stores the product, its images and its category edges. Returns the new id.
    async fn insert(&self, product: &NormalizedProduct) -> Result<i32>;

    /// Overwrites scalar fields, appends `product.images` after the existing
    /// ones and replaces the category edges. Returns `false` if `id` is unknown.
    async fn update(&self, id: i32, product: &NormalizedProduct) -> Result<bool>;

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductResponse>>;

    async fn find_all(&self) -> Result<Vec<ProductResponse>>;

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<ProductResponse>>;

    /// Case-insensitive substring match on the product name.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<ProductResponse>>;

    /// Returns `false` if `id` is unknown.
    async fn delete(&self, id: i32) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Returns the categories that exist among `ids`, in id order.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Category>>;

    async fn find_all(&self) -> Result<Vec<Category>>;

    async fn create(&self, name: &str) -> Result<Category>;
}
