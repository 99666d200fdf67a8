//! Product write/read orchestration.
//!
//! Category ids that do not resolve to an existing category are ignored on
//! both create and update. On update, newly uploaded images are appended to
//! the existing ones while the category set is replaced wholesale.

use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    models::{Category, NormalizedProduct, ProductForm, ProductResponse, StoredFile},
    repository::{CategoryRepository, ProductRepository},
    services::{
        blob_store::{BlobStore, generate_filename},
        product_normalizer,
    },
};

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    blobs: Arc<dyn BlobStore>,
    max_files: usize,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        blobs: Arc<dyn BlobStore>,
        max_files: usize,
    ) -> Self {
        Self {
            products,
            categories,
            blobs,
            max_files,
        }
    }

    pub async fn create_product(&self, normalized: NormalizedProduct) -> Result<ProductResponse> {
        let id = self.insert_product(normalized).await?;
        self.find_one(id).await
    }

    pub async fn update_product(
        &self,
        id: i32,
        normalized: NormalizedProduct,
    ) -> Result<ProductResponse> {
        self.write_update(id, normalized).await?;
        self.find_one(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<ProductResponse>> {
        self.products.find_all().await
    }

    pub async fn find_one(&self, id: i32) -> Result<ProductResponse> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Unknown categories simply have no products.
    pub async fn find_by_category(&self, category_id: i32) -> Result<Vec<ProductResponse>> {
        self.products.find_by_category(category_id).await
    }

    /// An empty fragment matches every product.
    pub async fn search_products(&self, fragment: &str) -> Result<Vec<ProductResponse>> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return self.products.find_all().await;
        }

        self.products.search_by_name(fragment).await
    }

    /// Stored image files are left in place.
    pub async fn delete_product(&self, id: i32) -> Result<()> {
        if !self.products.delete(id).await? {
            return Err(not_found(id));
        }

        tracing::info!(product_id = id, "Product deleted");

        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.categories.find_all().await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }

        let category = self.categories.create(name).await?;
        tracing::info!(category_id = category.id, "Category created");

        Ok(category)
    }

    pub async fn ping(&self) -> Result<()> {
        self.products.ping().await
    }

    /// Uploaded files are removed again only when the product write fails.
    pub async fn create_from_form(&self, form: ProductForm) -> Result<ProductResponse> {
        let stored = self.store_uploads(&form).await?;

        let written = match product_normalizer::normalize(&form.fields, &stored) {
            Ok(normalized) => self.insert_product(normalized).await,
            Err(e) => Err(e),
        };
        let id = self.discard_on_error(written, &stored).await?;

        self.find_one(id).await
    }

    pub async fn update_from_form(&self, id: i32, form: ProductForm) -> Result<ProductResponse> {
        let stored = self.store_uploads(&form).await?;

        let written = match product_normalizer::normalize(&form.fields, &stored) {
            Ok(normalized) => self.write_update(id, normalized).await,
            Err(e) => Err(e),
        };
        self.discard_on_error(written, &stored).await?;

        self.find_one(id).await
    }

    async fn insert_product(&self, normalized: NormalizedProduct) -> Result<i32> {
        let resolved = self.resolve_categories(normalized).await?;
        let id = self.products.insert(&resolved).await?;

        tracing::info!(
            product_id = id,
            images = resolved.images.len(),
            categories = resolved.category_ids.len(),
            "Product created"
        );

        Ok(id)
    }

    async fn write_update(&self, id: i32, normalized: NormalizedProduct) -> Result<()> {
        self.find_one(id).await?;

        let resolved = self.resolve_categories(normalized).await?;
        if !self.products.update(id, &resolved).await? {
            return Err(not_found(id));
        }

        tracing::info!(
            product_id = id,
            appended_images = resolved.images.len(),
            categories = resolved.category_ids.len(),
            "Product updated"
        );

        Ok(())
    }

    async fn resolve_categories(&self, mut product: NormalizedProduct) -> Result<NormalizedProduct> {
        let existing = self.categories.find_by_ids(&product.category_ids).await?;

        if existing.len() != product.category_ids.len() {
            tracing::warn!(
                requested = ?product.category_ids,
                found = existing.len(),
                "Ignoring unknown category ids"
            );
        }

        product
            .category_ids
            .retain(|id| existing.iter().any(|c| c.id == *id));

        Ok(product)
    }

    async fn store_uploads(&self, form: &ProductForm) -> Result<Vec<StoredFile>> {
        if form.files.len() > self.max_files {
            return Err(AppError::UploadLimit {
                max: self.max_files,
                received: form.files.len(),
            });
        }

        let mut stored = Vec::with_capacity(form.files.len());
        for file in &form.files {
            let filename = generate_filename(&file.original_name);

            if let Err(e) = self.blobs.put(&filename, &file.data).await {
                self.remove_blobs(&stored).await;
                return Err(e);
            }

            stored.push(StoredFile {
                original_name: file.original_name.clone(),
                filename,
            });
        }

        Ok(stored)
    }

    async fn discard_on_error<T>(&self, result: Result<T>, stored: &[StoredFile]) -> Result<T> {
        if result.is_err() {
            self.remove_blobs(stored).await;
        }
        result
    }

    async fn remove_blobs(&self, stored: &[StoredFile]) {
        for file in stored {
            if let Err(e) = self.blobs.remove(&file.filename).await {
                tracing::warn!(
                    filename = %file.filename,
                    original = %file.original_name,
                    "Failed to remove uploaded file: {}",
                    e
                );
            }
        }
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Product with id {} not found", id))
}
