//! Domain models and value objects

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A raw product offer as scraped/ingested from a merchant feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    /// Product title exactly as scraped; no invariants beyond being text
    pub title: String,
    /// URL of the offer page
    pub url: String,
    /// Merchant/source name
    pub merchant: String,
    /// Price in minor units (cents), if known
    #[serde(default)]
    pub price_cents: Option<i64>,
    /// ISO 4217 currency code, if known
    #[serde(default)]
    pub currency: Option<String>,
    /// Product image URL, if any
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A deduplicated catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Unique record ID
    pub id: Uuid,
    /// Content-derived identifier; listings sharing it merge into one entry
    pub dedupe_key: String,
    /// URL slug, unique within the catalog
    pub slug: String,
    /// Display title (raw title of the first listing seen)
    pub title: String,
    /// Normalized form of the title the dedupe key was derived from
    pub normalized_title: String,
    /// Offer page URL
    pub url: String,
    /// Merchant/source name
    pub merchant: String,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// How many listings have merged into this entry
    pub times_seen: u32,
    /// When the product was first ingested
    #[serde(with = "time::serde::rfc3339")]
    pub first_seen_at: OffsetDateTime,
    /// When a listing for this product was last ingested
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen_at: OffsetDateTime,
}

/// Per-listing ingestion result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// A new catalog entry was created
    Inserted { dedupe_key: String, slug: String },
    /// The listing merged into an existing entry
    Merged { dedupe_key: String },
    /// The listing was not ingested (filtered, malformed, etc.)
    Skipped { reason: String },
    /// The store rejected the listing
    Failed { error: String },
}

/// Per-site JSON configuration (one site = one tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Tenant identifier selecting which content set is served
    pub site_id: String,
    /// Human-readable site name
    pub name: String,
    /// Hostnames that resolve to this site
    #[serde(default)]
    pub domains: Vec<String>,
    /// BCP 47 locale tag, if the site is locale-specific
    #[serde(default)]
    pub locale: Option<String>,
    /// Affiliate tag appended to outbound offer links
    #[serde(default)]
    pub affiliate_tag: Option<String>,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

/// Offer gallery settings for a site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Maximum products rendered per gallery page
    #[serde(default = "default_max_products")]
    pub max_products: usize,
}

fn default_max_products() -> usize {
    24
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_products: default_max_products(),
        }
    }
}
