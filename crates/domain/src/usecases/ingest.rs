//! Ingest use case - merges raw listings into the deduplicated catalog

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    dedupe::{dedupe_key, normalize_title},
    model::{CatalogProduct, IngestOutcome, RawListing},
    ports::{CatalogError, CatalogStore, Clock},
    slug::slug_for,
};
use regex::Regex;

/// Configuration for the ingest use case
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Minimum length of the normalized title, in characters
    pub min_title_chars: usize,
    /// Regex patterns for listings to ignore (matched against the raw title)
    pub ignore_patterns: Vec<String>,
    /// Dry run mode (report outcomes without writing)
    pub dry_run: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_title_chars: 3,
            ignore_patterns: vec![],
            dry_run: true,
        }
    }
}

/// Ingest orchestrator
pub struct IngestUseCase<S, Cl>
where
    S: CatalogStore + ?Sized,
    Cl: Clock + ?Sized,
{
    store: Arc<S>,
    clock: Arc<Cl>,
    config: IngestConfig,
    ignore_patterns: Vec<Regex>,
}

impl<S, Cl> IngestUseCase<S, Cl>
where
    S: CatalogStore + ?Sized,
    Cl: Clock + ?Sized,
{
    pub fn new(store: Arc<S>, clock: Arc<Cl>, config: IngestConfig) -> Self {
        let ignore_patterns = compile_ignore_patterns(&config.ignore_patterns);
        Self {
            store,
            clock,
            config,
            ignore_patterns,
        }
    }

    /// Ingest a batch of listings, returning one outcome per listing in
    /// input order. Store failures are reported per listing; they do not
    /// abort the batch.
    pub async fn ingest_batch(&self, listings: Vec<RawListing>) -> Vec<(String, IngestOutcome)> {
        let mut results = Vec::with_capacity(listings.len());

        for listing in listings {
            let outcome = self.ingest_one(&listing).await;
            results.push((listing.title, outcome));
        }

        results
    }

    /// Ingest a single listing
    pub async fn ingest_one(&self, listing: &RawListing) -> IngestOutcome {
        if let Some(reason) = self.filter_reason(listing) {
            tracing::debug!(title = %listing.title, reason = %reason, "Skipping listing");
            return IngestOutcome::Skipped { reason };
        }

        let key = dedupe_key(&listing.title);

        let existing = match self.store.find_by_dedupe_key(&key).await {
            Ok(existing) => existing,
            Err(e) => {
                return IngestOutcome::Failed {
                    error: format!("Catalog lookup failed: {}", e),
                };
            }
        };

        match existing {
            Some(product) => self.merge(listing, &product).await,
            None => self.insert(listing, key).await,
        }
    }

    /// Reason to skip a listing, if any
    fn filter_reason(&self, listing: &RawListing) -> Option<String> {
        let normalized = normalize_title(&listing.title);

        if normalized.is_empty() {
            return Some("Title normalizes to empty".to_string());
        }

        if normalized.chars().count() < self.config.min_title_chars {
            return Some(format!(
                "Normalized title shorter than {} chars",
                self.config.min_title_chars
            ));
        }

        if self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.is_match(&listing.title))
        {
            return Some("Matches ignore pattern".to_string());
        }

        None
    }

    async fn merge(&self, listing: &RawListing, product: &CatalogProduct) -> IngestOutcome {
        tracing::info!(
            dedupe_key = %product.dedupe_key,
            slug = %product.slug,
            merchant = %listing.merchant,
            "Merging listing into existing product"
        );

        if self.config.dry_run {
            return IngestOutcome::Merged {
                dedupe_key: product.dedupe_key.clone(),
            };
        }

        match self
            .store
            .record_seen(&product.dedupe_key, listing.price_cents, self.clock.now())
            .await
        {
            Ok(()) => IngestOutcome::Merged {
                dedupe_key: product.dedupe_key.clone(),
            },
            Err(e) => IngestOutcome::Failed {
                error: format!("Merge failed: {}", e),
            },
        }
    }

    async fn insert(&self, listing: &RawListing, key: String) -> IngestOutcome {
        let slug = match self.unique_slug(&listing.title, &key).await {
            Ok(slug) => slug,
            Err(e) => {
                return IngestOutcome::Failed {
                    error: format!("Slug lookup failed: {}", e),
                };
            }
        };

        tracing::info!(
            dedupe_key = %key,
            slug = %slug,
            merchant = %listing.merchant,
            "Inserting new product"
        );

        if self.config.dry_run {
            return IngestOutcome::Inserted {
                dedupe_key: key,
                slug,
            };
        }

        let now = self.clock.now();
        let product = CatalogProduct {
            id: Uuid::new_v4(),
            dedupe_key: key.clone(),
            slug: slug.clone(),
            title: listing.title.clone(),
            normalized_title: normalize_title(&listing.title),
            url: listing.url.clone(),
            merchant: listing.merchant.clone(),
            price_cents: listing.price_cents,
            currency: listing.currency.clone(),
            image_url: listing.image_url.clone(),
            times_seen: 1,
            first_seen_at: now,
            last_seen_at: now,
        };

        match self.store.insert(&product).await {
            Ok(()) => IngestOutcome::Inserted {
                dedupe_key: key,
                slug,
            },
            Err(e) => IngestOutcome::Failed {
                error: format!("Insert failed: {}", e),
            },
        }
    }

    /// Slug for a new product, suffixed with a key prefix when a different
    /// product already holds the slugified title
    async fn unique_slug(&self, title: &str, key: &str) -> Result<String, CatalogError> {
        let slug = slug_for(title, key);

        if self.store.slug_taken(&slug).await? {
            Ok(format!("{}-{}", slug, &key[..8]))
        } else {
            Ok(slug)
        }
    }
}

fn compile_ignore_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(error) => {
                tracing::warn!(pattern = %pattern, error = %error, "Invalid ignore pattern");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CatalogError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    struct FakeCatalogStore {
        by_key: Mutex<HashMap<String, CatalogProduct>>,
    }

    impl FakeCatalogStore {
        fn new() -> Self {
            Self {
                by_key: Mutex::new(HashMap::new()),
            }
        }

        fn count(&self) -> usize {
            self.by_key.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CatalogStore for FakeCatalogStore {
        async fn find_by_dedupe_key(
            &self,
            dedupe_key: &str,
        ) -> Result<Option<CatalogProduct>, CatalogError> {
            Ok(self.by_key.lock().unwrap().get(dedupe_key).cloned())
        }

        async fn insert(&self, product: &CatalogProduct) -> Result<(), CatalogError> {
            self.by_key
                .lock()
                .unwrap()
                .insert(product.dedupe_key.clone(), product.clone());
            Ok(())
        }

        async fn record_seen(
            &self,
            dedupe_key: &str,
            price_cents: Option<i64>,
            seen_at: OffsetDateTime,
        ) -> Result<(), CatalogError> {
            let mut by_key = self.by_key.lock().unwrap();
            let product = by_key
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
            Ok(self
                .by_key
                .lock()
                .unwrap()
                .values()
                .find(|p| p.slug == slug)
                .cloned())
        }

        async fn slug_taken(&self, slug: &str) -> Result<bool, CatalogError> {
            Ok(self
                .by_key
                .lock()
                .unwrap()
                .values()
                .any(|p| p.slug == slug))
        }

        async fn list_recent(&self, limit: usize) -> Result<Vec<CatalogProduct>, CatalogError> {
            let mut products: Vec<_> = self.by_key.lock().unwrap().values().cloned().collect();
            products.sort_by(|a, b| b.last_seen_at.cmp(&a.last_seen_at));
            products.truncate(limit);
            Ok(products)
        }
    }

    struct FakeClock {
        time: OffsetDateTime,
    }

    impl Clock for FakeClock {
        fn now(&self) -> OffsetDateTime {
            self.time
        }
    }

    fn listing(title: &str) -> RawListing {
        RawListing {
            title: title.to_string(),
            url: "https://shop.example/p/1".to_string(),
            merchant: "shop".to_string(),
            price_cents: Some(1999),
            currency: Some("USD".to_string()),
            image_url: None,
        }
    }

    fn usecase(
        store: Arc<FakeCatalogStore>,
        config: IngestConfig,
    ) -> IngestUseCase<FakeCatalogStore, FakeClock> {
        let clock = Arc::new(FakeClock {
            time: OffsetDateTime::now_utc(),
        });
        IngestUseCase::new(store, clock, config)
    }

    #[tokio::test]
    async fn test_insert_then_merge_on_equivalent_title() {
        let store = Arc::new(FakeCatalogStore::new());
        let usecase = usecase(
            Arc::clone(&store),
            IngestConfig {
                dry_run: false,
                ..Default::default()
            },
        );

        let results = usecase
            .ingest_batch(vec![listing("Office Chair (Black)"), listing("office chair [black]")])
            .await;

        assert!(matches!(results[0].1, IngestOutcome::Inserted { .. }));
        assert!(matches!(results[1].1, IngestOutcome::Merged { .. }));
        assert_eq!(store.count(), 1);

        let key = dedupe_key("Office Chair (Black)");
        let product = store.find_by_dedupe_key(&key).await.unwrap().unwrap();
        assert_eq!(product.times_seen, 2);
    }

    #[tokio::test]
    async fn test_dry_run_does_not_write() {
        let store = Arc::new(FakeCatalogStore::new());
        let usecase = usecase(Arc::clone(&store), IngestConfig::default());

        let results = usecase.ingest_batch(vec![listing("Office Chair")]).await;

        assert!(matches!(results[0].1, IngestOutcome::Inserted { .. }));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_empty_and_short_titles_are_skipped() {
        let store = Arc::new(FakeCatalogStore::new());
        let usecase = usecase(
            Arc::clone(&store),
            IngestConfig {
                dry_run: false,
                ..Default::default()
            },
        );

        let results = usecase
            .ingest_batch(vec![listing("!!!"), listing("ab")])
            .await;

        assert!(matches!(results[0].1, IngestOutcome::Skipped { .. }));
        assert!(matches!(results[1].1, IngestOutcome::Skipped { .. }));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_ignore_patterns_filter_listings() {
        let store = Arc::new(FakeCatalogStore::new());
        let usecase = usecase(
            Arc::clone(&store),
            IngestConfig {
                dry_run: false,
                ignore_patterns: vec!["^AD:".to_string()],
                ..Default::default()
            },
        );

        let results = usecase
            .ingest_batch(vec![listing("AD: Sponsored chair"), listing("Plain chair")])
            .await;

        assert!(matches!(results[0].1, IngestOutcome::Skipped { .. }));
        assert!(matches!(results[1].1, IngestOutcome::Inserted { .. }));
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_slug_collision_gets_key_suffix() {
        let store = Arc::new(FakeCatalogStore::new());
        let usecase = usecase(
            Arc::clone(&store),
            IngestConfig {
                dry_run: false,
                ..Default::default()
            },
        );

        // Different dedupe keys ("." survives normalization) but same slug
        let results = usecase
            .ingest_batch(vec![listing("Desk Lamp"), listing("Desk Lamp.")])
            .await;

        let IngestOutcome::Inserted { slug: first, .. } = &results[0].1 else {
            panic!("expected insert");
        };
        let IngestOutcome::Inserted { slug: second, .. } = &results[1].1 else {
            panic!("expected insert");
        };

        assert_eq!(first, "desk-lamp");
        assert!(second.starts_with("desk-lamp-"));
        assert_ne!(first, second);
        assert_eq!(store.count(), 2);
    }
}
