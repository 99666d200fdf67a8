use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};

use crate::{
    error::Result,
    models::{NormalizedProduct, Product, ProductImage, ProductResponse},
    queries::category_queries,
};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.discount, p.created_at, p.updated_at";

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.id ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_by_category(pool: &PgPool, category_id: i32) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p
         INNER JOIN product_categories pc ON pc.product_id = p.id
         WHERE pc.category_id = $1
         ORDER BY p.id ASC"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn search_by_name(pool: &PgPool, fragment: &str) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products p
         WHERE p.name ILIKE $1
         ORDER BY p.id ASC"
    ))
    .bind(format!("%{}%", escape_like(fragment)))
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn insert_product(conn: &mut PgConnection, req: &NormalizedProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, description, price, discount)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, description, price, discount, created_at, updated_at
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(req.discount)
    .fetch_one(&mut *conn)
    .await?;

    Ok(product)
}

pub async fn update_product(
    conn: &mut PgConnection,
    id: i32,
    req: &NormalizedProduct,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET
            name = $1,
            description = $2,
            price = $3,
            discount = $4,
            updated_at = NOW()
        WHERE id = $5
        RETURNING id, name, description, price, discount, created_at, updated_at
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.price)
    .bind(req.discount)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

/// Adds images after the product's current last position, keeping the given order.
pub async fn append_images(conn: &mut PgConnection, product_id: i32, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO product_images (product_id, path, position)
        SELECT
            $1,
            img.path,
            (COALESCE((SELECT MAX(position) FROM product_images WHERE product_id = $1), 0) + img.ord)::int
        FROM unnest($2::text[]) WITH ORDINALITY AS img(path, ord)
        "#,
    )
    .bind(product_id)
    .bind(paths)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn find_images_by_product_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<ProductImage>> {
    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT product_id, path
         FROM product_images
         WHERE product_id = ANY($1)
         ORDER BY product_id, position ASC",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(images)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Batch-loads images and categories for `products` and assembles responses
/// in the original product order.
pub async fn with_relations(pool: &PgPool, products: Vec<Product>) -> Result<Vec<ProductResponse>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<i32> = products.iter().map(|p| p.id).collect();

    let mut images_map: HashMap<i32, Vec<String>> = HashMap::new();
    for image in find_images_by_product_ids(pool, &product_ids).await? {
        images_map.entry(image.product_id).or_default().push(image.path);
    }

    let mut categories_map: HashMap<i32, Vec<_>> = HashMap::new();
    for edge in category_queries::find_by_product_ids(pool, &product_ids).await? {
        categories_map
            .entry(edge.product_id)
            .or_default()
            .push(edge.category);
    }

    let result = products
        .into_iter()
        .map(|product| ProductResponse {
            images: images_map.remove(&product.id).unwrap_or_default(),
            categories: categories_map.remove(&product.id).unwrap_or_default(),
            product,
        })
        .collect();

    Ok(result)
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
