//! offerbase adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `catalog`: SQLite and in-memory catalog stores
//! - `sites`: Filesystem-based per-site configuration with read-through cache
//! - `completion`: Completion API wrappers (OpenAI, Anthropic, stub)

mod catalog_memory;
mod catalog_sqlite;
mod site_config_fs;

pub mod completion;

/// Re-exports for catalog store adapters
pub mod catalog {
    pub use crate::catalog_memory::InMemoryCatalogStore;
    pub use crate::catalog_sqlite::SqliteCatalogStore;
}

/// Re-exports for site configuration adapters
pub mod sites {
    pub use crate::site_config_fs::FsSiteConfigSource;
}
