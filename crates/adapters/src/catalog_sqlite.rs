//! SQLite catalog store implementation

use async_trait::async_trait;
use offerbase_domain::{CatalogError, CatalogProduct, CatalogStore};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;
use time::OffsetDateTime;
use uuid::Uuid;

/// SQLite-backed catalog store
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

/// Column order used by every product SELECT
type ProductRow = (
    String,         // id
    String,         // dedupe_key
    String,         // slug
    String,         // title
    String,         // normalized_title
    String,         // url
    String,         // merchant
    Option<i64>,    // price_cents
    Option<String>, // currency
    Option<String>, // image_url
    i64,            // times_seen
    String,         // first_seen_at
    String,         // last_seen_at
);

const PRODUCT_COLUMNS: &str = "id, dedupe_key, slug, title, normalized_title, url, merchant, \
                               price_cents, currency, image_url, times_seen, first_seen_at, \
                               last_seen_at";

impl SqliteCatalogStore {
    /// Create a new SQLite catalog store, initializing the database if needed
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let db_path = db_path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CatalogError::Database(format!("Failed to create directory: {}", e)))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing)
    pub async fn in_memory() -> Result<Self, CatalogError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                dedupe_key TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                normalized_title TEXT NOT NULL,
                url TEXT NOT NULL,
                merchant TEXT NOT NULL,
                price_cents INTEGER,
                currency TEXT,
                image_url TEXT,
                times_seen INTEGER NOT NULL,
                first_seen_at TEXT NOT NULL,
                last_seen_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_products_last_seen
            ON products(last_seen_at)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn product_from_row(row: ProductRow) -> Result<CatalogProduct, CatalogError> {
        let (
            id,
            dedupe_key,
            slug,
            title,
            normalized_title,
            url,
            merchant,
            price_cents,
            currency,
            image_url,
            times_seen,
            first_seen_at,
            last_seen_at,
        ) = row;

        let id = Uuid::parse_str(&id).map_err(|e| CatalogError::Serialization(e.to_string()))?;

        Ok(CatalogProduct {
            id,
            dedupe_key,
            slug,
            title,
            normalized_title,
            url,
            merchant,
            price_cents,
            currency,
            image_url,
            times_seen: u32::try_from(times_seen)
                .map_err(|e| CatalogError::Serialization(e.to_string()))?,
            first_seen_at: parse_timestamp(&first_seen_at)?,
            last_seen_at: parse_timestamp(&last_seen_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, CatalogError> {
    OffsetDateTime::parse(value, &time::format_description::well_known::Rfc3339)
        .map_err(|e| CatalogError::Serialization(e.to_string()))
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, CatalogError> {
    value
        .format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| CatalogError::Serialization(e.to_string()))
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn find_by_dedupe_key(
        &self,
        dedupe_key: &str,
    ) -> Result<Option<CatalogProduct>, CatalogError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE dedupe_key = ?",
            PRODUCT_COLUMNS
        ))
        .bind(dedupe_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        row.map(Self::product_from_row).transpose()
    }

    async fn insert(&self, product: &CatalogProduct) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO products
            (id, dedupe_key, slug, title, normalized_title, url, merchant,
             price_cents, currency, image_url, times_seen, first_seen_at, last_seen_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.dedupe_key)
        .bind(&product.slug)
        .bind(&product.title)
        .bind(&product.normalized_title)
        .bind(&product.url)
        .bind(&product.merchant)
        .bind(product.price_cents)
        .bind(&product.currency)
        .bind(&product.image_url)
        .bind(i64::from(product.times_seen))
        .bind(format_timestamp(product.first_seen_at)?)
        .bind(format_timestamp(product.last_seen_at)?)
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    async fn record_seen(
        &self,
        dedupe_key: &str,
        price_cents: Option<i64>,
        seen_at: OffsetDateTime,
    ) -> Result<(), CatalogError> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                times_seen = times_seen + 1,
                price_cents = COALESCE(?, price_cents),
                last_seen_at = ?
            WHERE dedupe_key = ?
            "#,
        )
        .bind(price_cents)
        .bind(format_timestamp(seen_at)?)
        .bind(dedupe_key)
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(dedupe_key.to_string()));
        }

        Ok(())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<CatalogProduct>, CatalogError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE slug = ?",
            PRODUCT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        row.map(Self::product_from_row).transpose()
    }

    async fn slug_taken(&self, slug: &str) -> Result<bool, CatalogError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(count.0 > 0)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<CatalogProduct>, CatalogError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products ORDER BY last_seen_at DESC LIMIT ?",
            PRODUCT_COLUMNS
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        rows.into_iter().map(Self::product_from_row).collect()
    }
}
