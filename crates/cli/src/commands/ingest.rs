//! Ingest command - merge a catalog feed into the product store

use anyhow::{Context, Result};
use offerbase_adapters::catalog::SqliteCatalogStore;
use offerbase_domain::usecases::{IngestConfig, IngestUseCase};
use offerbase_domain::{IngestOutcome, RawListing, SystemClock};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::IngestArgs;
use crate::config::AppConfig;

pub async fn execute(args: IngestArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let listings = read_listings(&args)?;
    if listings.is_empty() {
        anyhow::bail!("No listings found in input");
    }

    let dry_run = if args.apply {
        false
    } else {
        config.general.dry_run
    };

    let db_path = args.db.as_ref().unwrap_or(&config.general.catalog_db_path);
    let store = SqliteCatalogStore::new(db_path)
        .await
        .context("Failed to open catalog database")?;

    let ingest_config = IngestConfig {
        min_title_chars: config.ingest.min_title_chars,
        ignore_patterns: config.ingest.ignore_patterns.clone(),
        dry_run,
    };

    tracing::info!(
        listings = listings.len(),
        dry_run = dry_run,
        db = %db_path.display(),
        "Starting ingest"
    );

    let usecase = IngestUseCase::new(Arc::new(store), Arc::new(SystemClock), ingest_config);
    let results = usecase.ingest_batch(listings).await;

    let mut inserted = 0usize;
    let mut merged = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for (_, outcome) in &results {
        match outcome {
            IngestOutcome::Inserted { .. } => inserted += 1,
            IngestOutcome::Merged { .. } => merged += 1,
            IngestOutcome::Skipped { .. } => skipped += 1,
            IngestOutcome::Failed { .. } => failed += 1,
        }
    }

    if args.json {
        let entries: Vec<_> = results
            .iter()
            .map(|(title, outcome)| {
                serde_json::json!({
                    "title": title,
                    "outcome": outcome,
                })
            })
            .collect();
        let output = serde_json::json!({
            "dry_run": dry_run,
            "inserted": inserted,
            "merged": merged,
            "skipped": skipped,
            "failed": failed,
            "listings": entries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (title, outcome) in &results {
            match outcome {
                IngestOutcome::Inserted { slug, .. } => {
                    println!("+ {} (slug: {})", title, slug);
                }
                IngestOutcome::Merged { .. } => {
                    println!("= {}", title);
                }
                IngestOutcome::Skipped { reason } => {
                    println!("- {} ({})", title, reason);
                }
                IngestOutcome::Failed { error } => {
                    println!("! {} ({})", title, error);
                }
            }
        }
        println!();
        println!(
            "{} inserted, {} merged, {} skipped, {} failed{}",
            inserted,
            merged,
            skipped,
            failed,
            if dry_run { " (dry run)" } else { "" }
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Read JSON Lines listings from the file argument or stdin
fn read_listings(args: &IngestArgs) -> Result<Vec<RawListing>> {
    let content = match args.file {
        Some(ref path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feed file: {}", path.display()))?,
        _ => {
            let mut lines = String::new();
            for line in io::stdin().lock().lines() {
                let line = line.context("Failed to read from stdin")?;
                lines.push_str(&line);
                lines.push('\n');
            }
            lines
        }
    };

    let mut listings = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let listing: RawListing = serde_json::from_str(line)
            .with_context(|| format!("Invalid listing on line {}", index + 1))?;
        listings.push(listing);
    }

    Ok(listings)
}
