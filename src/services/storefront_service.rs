use futures::future::join_all;

use crate::{models::CategoryGroup, services::product_service::ProductService};

/// Products grouped under every category, in category order.
///
/// Failures never abort the view: a category whose products cannot be
/// loaded is shown empty, and a failed category listing yields no groups.
#[derive(Clone)]
pub struct StorefrontService {
    products: ProductService,
}

impl StorefrontService {
    pub fn new(products: ProductService) -> Self {
        Self { products }
    }

    pub async fn grouped_view(&self) -> Vec<CategoryGroup> {
        let categories = match self.products.list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::warn!("Failed to load categories for storefront: {}", e);
                return Vec::new();
            }
        };

        let lookups = categories
            .iter()
            .map(|category| self.products.find_by_category(category.id));
        let results = join_all(lookups).await;

        categories
            .into_iter()
            .zip(results)
            .map(|(category, result)| {
                let products = result.unwrap_or_else(|e| {
                    tracing::warn!(
                        category_id = category.id,
                        "Failed to load products for category: {}",
                        e
                    );
                    Vec::new()
                });

                CategoryGroup { category, products }
            })
            .collect()
    }
}
