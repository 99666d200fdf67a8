use sqlx::{PgConnection, PgPool};

use crate::{
    error::Result,
    models::{Category, ProductCategory},
};

/// Get all categories
pub async fn get_all(pool: &PgPool) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

/// Find the existing categories among `ids`
pub async fn find_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<Category>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name FROM categories WHERE id = ANY($1) ORDER BY id ASC",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Get categories for several products at once
pub async fn find_by_product_ids(
    pool: &PgPool,
    product_ids: &[i32],
) -> Result<Vec<ProductCategory>> {
    let edges = sqlx::query_as::<_, ProductCategory>(
        "SELECT pc.product_id, c.id, c.name FROM categories c
         INNER JOIN product_categories pc ON c.id = pc.category_id
         WHERE pc.product_id = ANY($1)
         ORDER BY pc.product_id, c.id ASC",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await?;

    Ok(edges)
}

/// Create a new category
pub async fn create_category(pool: &PgPool, name: &str) -> Result<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Replace every category edge of a product with `category_ids`
pub async fn replace_product_categories(
    conn: &mut PgConnection,
    product_id: i32,
    category_ids: &[i32],
) -> Result<()> {
    sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    if !category_ids.is_empty() {
        let mut query_builder =
            sqlx::QueryBuilder::new("INSERT INTO product_categories (product_id, category_id) ");

        query_builder.push_values(category_ids, |mut b, category_id| {
            b.push_bind(product_id).push_bind(*category_id);
        });

        query_builder.build().execute(&mut *conn).await?;
    }

    Ok(())
}
