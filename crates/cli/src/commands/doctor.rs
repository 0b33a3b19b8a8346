//! Doctor command - validate configuration and show status

use anyhow::Result;
use offerbase_adapters::sites::FsSiteConfigSource;
use offerbase_domain::SiteConfigSource;
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    sites: CheckResult,
    catalog: CheckResult,
    completion: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        sites: CheckResult::error("Not checked"),
        catalog: CheckResult::error("Not checked"),
        completion: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.sites = check_sites(config).await;
        report.catalog = check_catalog(config);
        report.completion = check_completion(config);
    }

    // Determine overall status
    let checks = [
        &report.config,
        &report.sites,
        &report.catalog,
        &report.completion,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_sites(config: &AppConfig) -> CheckResult {
    let dir = &config.general.sites_dir;

    if !dir.exists() {
        return CheckResult::warn(format!("Sites directory does not exist: {}", dir.display()));
    }

    let source = match FsSiteConfigSource::new(dir) {
        Ok(s) => s,
        Err(e) => {
            return CheckResult::error(format!("Failed to open sites directory: {}", e));
        }
    };

    let site_ids = match source.list_sites().await {
        Ok(ids) => ids,
        Err(e) => {
            return CheckResult::error(format!("Failed to list sites: {}", e));
        }
    };

    if site_ids.is_empty() {
        return CheckResult::warn(format!("No sites configured in {}", dir.display()));
    }

    // Every site file must parse
    for site_id in &site_ids {
        if let Err(e) = source.load(site_id).await {
            return CheckResult::error(format!("Site {} failed to load: {}", site_id, e));
        }
    }

    let default_note = match &config.sites.default_site {
        Some(default) if site_ids.contains(default) => format!(", default: {}", default),
        Some(default) => {
            return CheckResult::warn(format!(
                "{} sites loaded, but default site {} has no config file",
                site_ids.len(),
                default
            ));
        }
        None => ", no default".to_string(),
    };

    CheckResult::ok(format!("{} sites loaded{}", site_ids.len(), default_note)).with_details(
        serde_json::json!({
            "count": site_ids.len(),
            "ids": site_ids,
        }),
    )
}

fn check_catalog(config: &AppConfig) -> CheckResult {
    let path = &config.general.catalog_db_path;

    if path.exists() {
        return CheckResult::ok(format!("Catalog database: {}", path.display()));
    }

    // A missing file is fine; it is created on first ingest
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            CheckResult::warn(format!(
                "Catalog database parent directory does not exist: {}",
                parent.display()
            ))
        }
        _ => CheckResult::ok(format!(
            "Catalog database will be created at {}",
            path.display()
        )),
    }
}

fn check_completion(config: &AppConfig) -> CheckResult {
    let provider = &config.completion.provider;
    let model = &config.completion.model;

    // Check if the API key env var is set (without revealing the value)
    let api_key_env = match provider.as_str() {
        "openai" => &config.completion.openai.api_key_env,
        "anthropic" => &config.completion.anthropic.api_key_env,
        "stub" => return CheckResult::ok("Provider: stub (offline)".to_string()),
        other => return CheckResult::warn(format!("Unknown provider: {}", other)),
    };

    if api_key_env.is_empty() {
        return CheckResult::error(format!("No API key env var configured for {}", provider));
    }

    match std::env::var(api_key_env) {
        Ok(val) if !val.is_empty() => CheckResult::ok(format!(
            "Provider: {}, Model: {}, API key: {} (set)",
            provider, model, api_key_env
        )),
        _ => CheckResult::warn(format!(
            "Provider: {}, Model: {}, API key: {} (not set)",
            provider, model, api_key_env
        )),
    }
}

fn print_report(report: &DoctorReport) {
    println!("offerbase Doctor Report");
    println!("=======================");
    println!();

    print_check("Config", &report.config);
    print_check("Sites", &report.sites);
    print_check("Catalog", &report.catalog);
    print_check("Completion", &report.completion);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to run! Try: offerbase ingest --file feed.jsonl");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
