use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    database,
    error::Result,
    models::{Category, NormalizedProduct, ProductResponse},
    queries::{category_queries, products_queries},
    repository::{CategoryRepository, ProductRepository},
};

#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgCatalogRepository {
    async fn insert(&self, product: &NormalizedProduct) -> Result<i32> {
        let mut tx = self.pool.begin().await?;

        let created = products_queries::insert_product(&mut tx, product).await?;
        products_queries::append_images(&mut tx, created.id, &product.images).await?;
        category_queries::replace_product_categories(&mut tx, created.id, &product.category_ids)
            .await?;

        tx.commit().await?;

        Ok(created.id)
    }

    async fn update(&self, id: i32, product: &NormalizedProduct) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        if products_queries::update_product(&mut tx, id, product)
            .await?
            .is_none()
        {
            return Ok(false);
        }

        products_queries::append_images(&mut tx, id, &product.images).await?;
        category_queries::replace_product_categories(&mut tx, id, &product.category_ids).await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductResponse>> {
        let Some(product) = products_queries::find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };

        let mut responses = products_queries::with_relations(&self.pool, vec![product]).await?;
        Ok(responses.pop())
    }

    async fn find_all(&self) -> Result<Vec<ProductResponse>> {
        let products = products_queries::find_all(&self.pool).await?;
        products_queries::with_relations(&self.pool, products).await
    }

    async fn find_by_category(&self, category_id: i32) -> Result<Vec<ProductResponse>> {
        let products = products_queries::find_by_category(&self.pool, category_id).await?;
        products_queries::with_relations(&self.pool, products).await
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<ProductResponse>> {
        let products = products_queries::search_by_name(&self.pool, fragment).await?;
        products_queries::with_relations(&self.pool, products).await
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let deleted = products_queries::delete_product(&self.pool, id).await?;
        Ok(deleted > 0)
    }

    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }
}

#[async_trait]
impl CategoryRepository for PgCatalogRepository {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Category>> {
        category_queries::find_by_ids(&self.pool, ids).await
    }

    async fn find_all(&self) -> Result<Vec<Category>> {
        category_queries::get_all(&self.pool).await
    }

    async fn create(&self, name: &str) -> Result<Category> {
        category_queries::create_category(&self.pool, name).await
    }
}
