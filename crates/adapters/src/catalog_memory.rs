//! In-memory catalog store for testing and offline mode

use async_trait::async_trait;
use offerbase_domain::{CatalogError, CatalogProduct, CatalogStore};
use std::collections::HashMap;
use std::sync::RwLock;
use time::OffsetDateTime;

/// In-memory catalog store implementation, keyed by dedupe key
pub struct InMemoryCatalogStore {
    products: RwLock<HashMap<String, CatalogProduct>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_by_dedupe_key(
        &self,
        dedupe_key: &str,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        let products = self
            .products
            .read()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(products.get(dedupe_key).cloned())
    }

    async fn insert(&self, product: &CatalogProduct) -> Result<(), CatalogError> {
        let mut products = self
            .products
            .write()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        products.insert(product.dedupe_key.clone(), product.clone());
        Ok(())
    }

    async fn record_seen(
        &self,
        dedupe_key: &str,
        price_cents: Option<i64>,
        seen_at: OffsetDateTime,
    ) -> Result<(), CatalogError> {
        let mut products = self
            .products
            .write()
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let product = products
            .get_mut(dedupe_key)
            .ok_or_else(|| CatalogError::NotFound(dedupe_key.to_string()))?;

        product.times_seen += 1;
        if price_cents.is_some() {
            product.price_cents = price_cents;
        }
        product.last_seen_at = seen_at;

        Ok(())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<CatalogProduct>, CatalogError> {
        let products = self
            .products
            .read()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(products.values().find(|p| p.slug == slug).cloned())
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, CatalogError> {
        let products = self
            .products
            .read()
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(products.values().any(|p| p.slug == slug))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<CatalogProduct>, CatalogError> {
        let products = self
            .products
            .read()
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut all: Vec<_> = products.values().cloned().collect();
        all.sort_by(|a, b| b.last_seen_at.cmp(&a.last_seen_at));
        all.truncate(limit);
        Ok(all)
    }
}
