//! Dedupe command - one-shot key derivation

use anyhow::{Context, Result};
use offerbase_domain::{dedupe_key, normalize_title, slug_for};
use std::io::{self, Read};

use crate::args::DedupeArgs;

pub async fn execute(args: DedupeArgs) -> Result<()> {
    let title = get_input_title(&args)?;
    let title = title.trim_end_matches(['\r', '\n']);

    let normalized = normalize_title(title);
    let key = dedupe_key(title);
    let slug = slug_for(title, &key);

    if args.json {
        let output = serde_json::json!({
            "title": title,
            "normalized_title": normalized,
            "dedupe_key": key,
            "slug": slug,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Title:      {}", title);
        println!("Normalized: {}", normalized);
        println!("Dedupe key: {}", key);
        println!("Slug:       {}", slug);
    }

    Ok(())
}

fn get_input_title(args: &DedupeArgs) -> Result<String> {
    if let Some(ref title) = args.title {
        return Ok(title.clone());
    }

    if let Some(ref path) = args.file {
        if path.as_os_str() == "-" {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read from stdin")?;
            return Ok(text);
        }

        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()));
    }

    // Default to stdin if no input specified
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read from stdin")?;
    Ok(text)
}
