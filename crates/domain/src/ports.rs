//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure. All
//! clients are constructed explicitly and injected; there are no process-wide
//! lazily-initialized globals.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{CatalogProduct, SiteConfig};

/// Error type for catalog store operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for the deduplicated product catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up a product by its dedupe key
    async fn find_by_dedupe_key(
        &self,
        dedupe_key: &str,
    ) -> Result<Option<CatalogProduct>, CatalogError>;

    /// Insert a new catalog entry
    async fn insert(&self, product: &CatalogProduct) -> Result<(), CatalogError>;

    /// Merge another sighting into an existing entry: bump times_seen,
    /// refresh price and last_seen_at
    async fn record_seen(
        &self,
        dedupe_key: &str,
        price_cents: Option<i64>,
        seen_at: OffsetDateTime,
    ) -> Result<(), CatalogError>;

    /// Look up a product by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<CatalogProduct>, CatalogError>;

    /// Whether a slug is already taken
    async fn slug_taken(&self, slug: &str) -> Result<bool, CatalogError>;

    /// Most recently seen products, newest first
    async fn list_recent(&self, limit: usize) -> Result<Vec<CatalogProduct>, CatalogError>;
}

/// Error type for site configuration loading
#[derive(Debug, Error)]
pub enum SiteConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },
    #[error("Unknown site: {0}")]
    UnknownSite(String),
}

/// Port for loading per-site configuration
#[async_trait]
pub trait SiteConfigSource: Send + Sync {
    /// Load the configuration for a site (implementations cache by site id)
    async fn load(&self, site_id: &str) -> Result<SiteConfig, SiteConfigError>;

    /// List all known site ids
    async fn list_sites(&self) -> Result<Vec<String>, SiteConfigError>;
}

/// Error type for completion API calls
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A completion request: prompt in, text out. Deliberately thin.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// User prompt
    pub prompt: String,
    /// Optional system instructions
    pub system: Option<String>,
}

/// Text returned by a completion provider
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
}

/// Port for third-party completion APIs
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run a single completion request
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
