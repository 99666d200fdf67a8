use serde::{Deserialize, Serialize};

use crate::models::ProductResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Edge row of the product/category association joined with the category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductCategory {
    pub product_id: i32,
    #[sqlx(flatten)]
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub products: Vec<ProductResponse>,
}
