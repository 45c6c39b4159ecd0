//! Paginated product collection for a single leaf category
//!
//! Pages are requested strictly one after another, starting at page 1,
//! until a page has no products or the request yields nothing. There is no
//! page cap; only the run deadline, checked between roots, bounds it.

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::category::ProductRecord;
use crate::domain::services::JsonSource;
use crate::infrastructure::config::CatalogConfig;

/// Collects every product of one leaf across its pages
pub struct ProductFetcher<'a, S: ?Sized> {
    source: &'a S,
    catalog: &'a CatalogConfig,
}

impl<'a, S: JsonSource + ?Sized> ProductFetcher<'a, S> {
    pub const fn new(source: &'a S, catalog: &'a CatalogConfig) -> Self {
        Self { source, catalog }
    }

    /// All products of `category_id` in page order. An empty shard means no
    /// request at all.
    pub async fn fetch_leaf(&self, category_id: u64, shard: &str) -> Vec<ProductRecord> {
        if shard.is_empty() {
            return Vec::new();
        }

        let url = self.catalog.product_url(shard);
        let mut products = Vec::new();
        let mut page: u32 = 1;

        loop {
            let query = [
                ("appType", self.catalog.app_type.to_string()),
                ("curr", self.catalog.currency.clone()),
                ("page", page.to_string()),
                ("xsubject", category_id.to_string()),
            ];
            let Some(body) = self.source.fetch_json(&url, &query).await.into_data() else {
                break;
            };

            let items = page_items(&body);
            if items.is_empty() {
                break;
            }
            debug!(
                "📄 cat_id={} page {}: {} items",
                category_id,
                page,
                items.len()
            );
            products.extend(items.iter().filter_map(parse_product));
            page += 1;
        }

        info!("📦 Collected {} products (cat_id={})", products.len(), category_id);
        products
    }
}

/// `data.products` of a listing page, empty when absent or not an array
fn page_items(body: &Value) -> &[Value] {
    body.pointer("/data/products")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// A product with a positive integer id; anything else is skipped
fn parse_product(item: &Value) -> Option<ProductRecord> {
    let id = item.get("id").and_then(Value::as_u64).filter(|&id| id != 0)?;
    let name = item.get("name").and_then(Value::as_str).unwrap_or_default();
    Some(ProductRecord::new(id, name))
}
