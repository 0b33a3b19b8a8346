//! Site resolution - maps an incoming request to a tenant site id
//!
//! Priority-ordered fallback chain: explicit request parameter, then the
//! site cookie, then a host-based lookup, then the configured default.

use std::collections::HashMap;

use crate::model::SiteConfig;

/// Default name of the cookie carrying the site id
pub const DEFAULT_SITE_COOKIE: &str = "site_id";

/// The request facts site resolution runs over
#[derive(Debug, Clone, Default)]
pub struct SiteRequest {
    /// Explicit site parameter (query param or CLI flag)
    pub explicit: Option<String>,
    /// Raw `Cookie:` header value, if present
    pub cookie_header: Option<String>,
    /// Raw `Host:` header value, if present
    pub host: Option<String>,
}

/// Resolves the active site for a request
#[derive(Debug, Clone)]
pub struct SiteResolver {
    cookie_name: String,
    host_map: HashMap<String, String>,
    default_site: Option<String>,
}

impl SiteResolver {
    pub fn new(host_map: HashMap<String, String>, default_site: Option<String>) -> Self {
        Self {
            cookie_name: DEFAULT_SITE_COOKIE.to_string(),
            host_map,
            default_site,
        }
    }

    /// Override the cookie name carrying the site id
    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    /// Resolve the site id for a request, or None when nothing matches
    pub fn resolve(&self, request: &SiteRequest) -> Option<String> {
        if let Some(site) = non_empty(request.explicit.as_deref()) {
            tracing::debug!(site = %site, "Site resolved from explicit parameter");
            return Some(site);
        }

        if let Some(header) = request.cookie_header.as_deref() {
            if let Some(site) = self.cookie_value(header) {
                tracing::debug!(site = %site, "Site resolved from cookie");
                return Some(site);
            }
        }

        if let Some(host) = request.host.as_deref() {
            if let Some(site) = self.lookup_host(host) {
                tracing::debug!(site = %site, host = %host, "Site resolved from host");
                return Some(site);
            }
        }

        self.default_site.clone()
    }

    /// First value of the site cookie in a raw `Cookie:` header
    fn cookie_value(&self, header: &str) -> Option<String> {
        header.split(';').find_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            if name.trim() == self.cookie_name {
                non_empty(Some(value.trim()))
            } else {
                None
            }
        })
    }

    /// Host lookup: case-insensitive, port stripped, `www.` tolerated
    fn lookup_host(&self, host: &str) -> Option<String> {
        let normalized = host
            .trim()
            .to_ascii_lowercase()
            .split(':')
            .next()
            .unwrap_or_default()
            .to_string();

        if let Some(site) = self.host_map.get(&normalized) {
            return Some(site.clone());
        }

        normalized
            .strip_prefix("www.")
            .and_then(|bare| self.host_map.get(bare))
            .cloned()
    }
}

/// Build a host -> site id map from site configurations
pub fn host_map_from_sites(sites: &[SiteConfig]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for site in sites {
        for domain in &site.domains {
            map.insert(domain.to_ascii_lowercase(), site.site_id.clone());
        }
    }
    map
}

fn non_empty(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
