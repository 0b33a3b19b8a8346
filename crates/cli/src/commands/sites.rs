//! Sites command - list, show, and resolve site configurations

use anyhow::{Context, Result};
use offerbase_adapters::sites::FsSiteConfigSource;
use offerbase_domain::usecases::{SiteRequest, SiteResolver, host_map_from_sites};
use offerbase_domain::{SiteConfig, SiteConfigSource};
use std::path::{Path, PathBuf};

use crate::args::{SitesArgs, SitesCommands};
use crate::config::AppConfig;

/// Env var that overrides the configured default site
const DEFAULT_SITE_ENV: &str = "OFFERBASE_SITE_ID";

pub async fn execute(args: SitesArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).unwrap_or_default();

    match args.command {
        SitesCommands::List { sites_dir, json } => {
            let dir = sites_dir.as_ref().unwrap_or(&config.general.sites_dir);
            list_sites(dir, json).await
        }
        SitesCommands::Show { site_id, sites_dir } => {
            let dir = sites_dir.as_ref().unwrap_or(&config.general.sites_dir);
            show_site(dir, &site_id).await
        }
        SitesCommands::Resolve {
            site,
            cookie,
            host,
            sites_dir,
        } => {
            let dir = sites_dir.as_ref().unwrap_or(&config.general.sites_dir);
            resolve_site(dir, &config, site, cookie, host).await
        }
    }
}

async fn list_sites(sites_dir: &Path, json: bool) -> Result<()> {
    let sites = load_all_sites(sites_dir).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sites)?);
    } else if sites.is_empty() {
        println!("No sites configured in {}", sites_dir.display());
    } else {
        for site in &sites {
            println!("{} - {} ({})", site.site_id, site.name, site.domains.join(", "));
        }
    }

    Ok(())
}

async fn show_site(sites_dir: &Path, site_id: &str) -> Result<()> {
    let source = open_source(sites_dir)?;
    let site = source
        .load(site_id)
        .await
        .with_context(|| format!("Failed to load site {}", site_id))?;

    println!("{}", serde_json::to_string_pretty(&site)?);
    Ok(())
}

async fn resolve_site(
    sites_dir: &Path,
    config: &AppConfig,
    site: Option<String>,
    cookie: Option<String>,
    host: Option<String>,
) -> Result<()> {
    let resolver = build_resolver(sites_dir, config).await?;

    let request = SiteRequest {
        explicit: site,
        cookie_header: cookie,
        host,
    };

    match resolver.resolve(&request) {
        Some(site_id) => {
            println!("{}", site_id);
            Ok(())
        }
        None => {
            anyhow::bail!("No site matched and no default is configured");
        }
    }
}

async fn build_resolver(sites_dir: &Path, config: &AppConfig) -> Result<SiteResolver> {
    let sites = load_all_sites(sites_dir).await?;
    let host_map = host_map_from_sites(&sites);

    let default_site = std::env::var(DEFAULT_SITE_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| config.sites.default_site.clone());

    Ok(SiteResolver::new(host_map, default_site)
        .with_cookie_name(config.sites.cookie_name.clone()))
}

async fn load_all_sites(sites_dir: &Path) -> Result<Vec<SiteConfig>> {
    let source = open_source(sites_dir)?;
    let site_ids = source.list_sites().await.context("Failed to list sites")?;

    let mut sites = Vec::new();
    for site_id in &site_ids {
        let site = source
            .load(site_id)
            .await
            .with_context(|| format!("Failed to load site {}", site_id))?;
        sites.push(site);
    }

    Ok(sites)
}

fn open_source(sites_dir: &Path) -> Result<FsSiteConfigSource> {
    FsSiteConfigSource::new(sites_dir)
        .with_context(|| format!("Failed to open sites directory: {}", sites_dir.display()))
}
