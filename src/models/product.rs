use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductImage {
    pub product_id: i32,
    pub path: String,
}

/// A product together with its ordered image paths and resolved categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<String>,
    pub categories: Vec<Category>,
}

/// Validated, strongly-typed product data ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProduct {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub discount: Option<Decimal>,
    pub images: Vec<String>,
    pub category_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ProductSearchQuery {
    pub name: Option<String>,
}
