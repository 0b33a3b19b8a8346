//! Filesystem-based per-site configuration source
//!
//! Sites live as `<site_id>.json` files in a single directory. Loaded
//! configs are cached by site id (read-through); `invalidate` drops a
//! cached entry so the next load re-reads the file.

use async_trait::async_trait;
use offerbase_domain::{SiteConfig, SiteConfigError, SiteConfigSource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Filesystem site configuration source with a read-through cache
pub struct FsSiteConfigSource {
    sites_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<SiteConfig>>>,
}

impl FsSiteConfigSource {
    /// Create a new site config source rooted at the given directory
    pub fn new(sites_dir: impl AsRef<Path>) -> Result<Self, SiteConfigError> {
        let sites_dir = sites_dir.as_ref().to_path_buf();

        if !sites_dir.exists() {
            return Err(SiteConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Sites directory not found: {}", sites_dir.display()),
            )));
        }

        Ok(Self {
            sites_dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Drop a cached entry so the next load re-reads the file
    pub fn invalidate(&self, site_id: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(site_id);
        }
    }

    /// Drop all cached entries
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    fn site_path(&self, site_id: &str) -> PathBuf {
        self.sites_dir.join(format!("{}.json", site_id))
    }

    fn read_site_file(&self, site_id: &str) -> Result<SiteConfig, SiteConfigError> {
        let path = self.site_path(site_id);

        if !path.is_file() {
            return Err(SiteConfigError::UnknownSite(site_id.to_string()));
        }

        let content = std::fs::read_to_string(&path)?;

        let config: SiteConfig =
            serde_json::from_str(&content).map_err(|e| SiteConfigError::Parse {
                file: path.display().to_string(),
                message: e.to_string(),
            })?;

        if config.site_id != site_id {
            return Err(SiteConfigError::Parse {
                file: path.display().to_string(),
                message: format!(
                    "site_id '{}' does not match filename '{}'",
                    config.site_id, site_id
                ),
            });
        }

        Ok(config)
    }
}

#[async_trait]
impl SiteConfigSource for FsSiteConfigSource {
    async fn load(&self, site_id: &str) -> Result<SiteConfig, SiteConfigError> {
        if let Ok(cache) = self.cache.read() {
            if let Some(config) = cache.get(site_id) {
                return Ok(config.as_ref().clone());
            }
        }

        let config = self.read_site_file(site_id)?;

        tracing::debug!(site_id = %site_id, "Loaded site config from disk");

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(site_id.to_string(), Arc::new(config.clone()));
        }

        Ok(config)
    }

    async fn list_sites(&self) -> Result<Vec<String>, SiteConfigError> {
        let mut sites = Vec::new();

        for entry in std::fs::read_dir(&self.sites_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sites.push(stem.to_string());
            }
        }

        // Sort for deterministic ordering
        sites.sort();

        Ok(sites)
    }
}
